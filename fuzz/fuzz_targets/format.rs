#![no_main]

mod mock;

use libfuzzer_sys::fuzz_target;
use mock::MockTime;
use rubytime::Format;

fuzz_target!(|data: (MockTime, &str)| {
    let (time, pattern) = data;
    let format = Format::compile(pattern);
    let _ = rubytime::format(&format, &time);
});
