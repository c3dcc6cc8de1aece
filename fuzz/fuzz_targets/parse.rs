#![no_main]

use libfuzzer_sys::fuzz_target;
use rubytime::{Format, ResolverOptions, TemporalAccessor, TemporalField};

fuzz_target!(|data: (&str, &str)| {
    let (pattern, input) = data;
    let format = Format::compile(pattern);

    if let Ok(timestamp) = rubytime::parse(&format, input, &ResolverOptions::default()) {
        for field in [
            TemporalField::InstantSeconds,
            TemporalField::NanoOfSecond,
            TemporalField::OffsetSeconds,
            TemporalField::Year,
            TemporalField::MonthOfYear,
            TemporalField::DayOfMonth,
            TemporalField::HourOfDay,
        ] {
            let _ = timestamp.get_long(field);
        }
    }

    let _ = rubytime::resolve_offset(input);
});
