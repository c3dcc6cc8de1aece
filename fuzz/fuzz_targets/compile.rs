#![no_main]

use libfuzzer_sys::fuzz_target;
use rubytime::Format;

fuzz_target!(|pattern: &str| {
    let format = Format::compile(pattern);
    // Compilation is total and tokens carry the source verbatim.
    assert_eq!(format.to_string(), pattern);
});
