use crate::tests::{check_all, check_format, MockTime, PartialTime};
use crate::{Error, Format, TemporalField};

#[test]
fn test_format() {
    #[rustfmt::skip]
    let times = [
        MockTime::new(1, 1, 1, 1, 1, 1, 1, 1, 1, -62_135_593_139, 0, "UTC"),
        MockTime::new(1, 1, 1, 1, 1, 1, 1, 1, 1, -62_135_593_139, 0, "+0000"),
        MockTime::new(1, 1, 1, 1, 1, 1, 1, 1, 1, -62_135_593_139, 0, ""),
        MockTime::new(-94, 1, 2, 13, 18, 19, 9876, 2, 2, -65_133_456_662, 561, "LMT"),
        MockTime::new(2094, 1, 2, 13, 18, 19, 9876, 6, 2, 3_913_273_099, 3600, "CET"),
    ];
    let (utc, numeric, nameless, lmt, cet) =
        (&times[0], &times[1], &times[2], &times[3], &times[4]);

    // Unterminated and unknown directives echo verbatim.
    check_format(lmt, "%", "%");
    check_format(lmt, "%-4", "%-4");
    check_format(lmt, "% ", "% ");
    check_format(lmt, "%-_ ", "%-_ ");

    check_format(lmt, "'%4Y'", "'-094'");
    check_format(lmt, "'%_Y'", "'  -94'");
    check_format(lmt, "'%y'", "'06'");
    check_format(lmt, "'%C'", "'-1'");

    check_format(utc, "'%z'", "'+0000'");
    check_format(lmt, "'%z'", "'+0009'");
    check_format(cet, "'%z'", "'+0100'");

    check_format(utc, "'%1z'", "'+0000'");
    check_format(lmt, "'%1z'", "'+0009'");
    check_format(cet, "'%1z'", "'+0100'");

    // The '-' flag renders UTC with a negative sign.
    check_format(utc, "'%-6z'", "'-00000'");
    check_format(lmt, "'%-6z'", "'+00009'");
    check_format(cet, "'%-6z'", "'+00100'");

    check_format(utc, "'%_6z'", "'  +000'");
    check_format(lmt, "'%_6z'", "'  +009'");
    check_format(cet, "'%_6z'", "'  +100'");

    check_format(utc, "'%:z'", "'+00:00'");
    check_format(lmt, "'%:z'", "'+00:09'");
    check_format(cet, "'%:z'", "'+01:00'");

    check_format(utc, "'%-7:z'", "'-000:00'");
    check_format(lmt, "'%-7:z'", "'+000:09'");
    check_format(cet, "'%-7:z'", "'+001:00'");

    check_format(utc, "'%_7:z'", "'  +0:00'");
    check_format(lmt, "'%_7:z'", "'  +0:09'");
    check_format(cet, "'%_7:z'", "'  +1:00'");

    check_format(utc, "'%::z'", "'+00:00:00'");
    check_format(lmt, "'%::z'", "'+00:09:21'");
    check_format(cet, "'%::z'", "'+01:00:00'");

    check_format(utc, "'%_10::z'", "'  +0:00:00'");
    check_format(lmt, "'%_10::z'", "'  +0:09:21'");
    check_format(cet, "'%_10::z'", "'  +1:00:00'");

    check_format(utc, "'%1:::z'", "'+00'");
    check_format(lmt, "'%1:::z'", "'+00:09:21'");
    check_format(cet, "'%1:::z'", "'+01'");

    check_format(utc, "'%8:::z'", "'+0000000'");
    check_format(lmt, "'%8:::z'", "'+00:09:21'");
    check_format(cet, "'%8:::z'", "'+0000001'");

    check_format(utc, "'%-_10:::z'", "'        -0'");
    check_format(lmt, "'%-_10:::z'", "'  +0:09:21'");
    check_format(cet, "'%-_10:::z'", "'        +1'");

    // Four colons compile but render like the minimal form.
    check_format(cet, "'%::::z'", "'+01'");
    check_format(lmt, "'%::::z'", "'+00:09:21'");

    check_format(utc, "'%10Z'", "'       UTC'");
    check_format(lmt, "'%10Z'", "'       LMT'");
    check_format(cet, "'%-^#10Z'", "'cet'");
    check_format(numeric, "'%010Z'", "'00000+0000'");
    // Without a name, %Z falls back to the offset.
    check_format(nameless, "'%Z'", "'+00:00'");

    check_format(lmt, "'%^#26c'", "' TUE JAN  2 13:18:19 -0094'");
}

#[test]
#[rustfmt::skip]
fn test_format_year_4_digits() {
    let times = [
        MockTime { year: -1111, ..Default::default() },
        MockTime { year: -11,   ..Default::default() },
        MockTime { year: 1,     ..Default::default() },
        MockTime { year: 1111,  ..Default::default() },
    ];

    check_all(&times, "'%Y'",    &["'-1111'", "'-0011'", "'0001'",  "'1111'"]);
    check_all(&times, "'%1Y'",   &["'-1111'", "'-11'",   "'1'",     "'1111'"]);
    check_all(&times, "'%4Y'",   &["'-1111'", "'-011'",  "'0001'",  "'1111'"]);
    check_all(&times, "'%-_5Y'", &["'-1111'", "'-11'",   "'1'",     "'1111'"]);
    check_all(&times, "'%-05Y'", &["'-1111'", "'-11'",   "'1'",     "'1111'"]);
    check_all(&times, "'%0_5Y'", &["'-1111'", "'  -11'", "'    1'", "' 1111'"]);
    check_all(&times, "'%_05Y'", &["'-1111'", "'-0011'", "'00001'", "'01111'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_year_div_100() {
    let times = [
        MockTime { year: -1111, ..Default::default() },
        MockTime { year: -11,   ..Default::default() },
        MockTime { year: 1,     ..Default::default() },
        MockTime { year: 1111,  ..Default::default() },
    ];

    check_all(&times, "'%C'",    &["'-12'",  "'-1'",   "'00'",   "'11'"]);
    check_all(&times, "'%1C'",   &["'-12'",  "'-1'",   "'0'",    "'11'"]);
    check_all(&times, "'%4C'",   &["'-012'", "'-001'", "'0000'", "'0011'"]);
    check_all(&times, "'%0_4C'", &["' -12'", "'  -1'", "'   0'", "'  11'"]);
    check_all(&times, "'%_04C'", &["'-012'", "'-001'", "'0000'", "'0011'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_month() {
    let times = [
        MockTime { month: 1,  ..Default::default() },
        MockTime { month: 11, ..Default::default() },
    ];

    check_all(&times, "'%m'",   &["'01'",   "'11'"]);
    check_all(&times, "'%1m'",  &["'1'",    "'11'"]);
    check_all(&times, "'%4m'",  &["'0001'", "'0011'"]);
    check_all(&times, "'%-_m'", &["'1'",    "'11'"]);
    check_all(&times, "'%0_m'", &["' 1'",   "'11'"]);
    check_all(&times, "'%_0m'", &["'01'",   "'11'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_month_name() {
    let times = [MockTime { month: 7, ..Default::default() }];

    check_all(&times, "'%B'",      &["'July'"]);
    check_all(&times, "'%1B'",     &["'July'"]);
    check_all(&times, "'%6B'",     &["'  July'"]);
    check_all(&times, "'%-_#^6B'", &["'JULY'"]);
    check_all(&times, "'%0_#6B'",  &["'  JULY'"]);
    check_all(&times, "'%_06B'",   &["'00July'"]);
    check_all(&times, "'%b'",      &["'Jul'"]);
    check_all(&times, "'%h'",      &["'Jul'"]);
    check_all(&times, "'%^b'",     &["'JUL'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_day_and_hour_padding() {
    let times = [
        MockTime { day: 5, hour: 3, ..Default::default() },
        MockTime { day: 25, hour: 13, ..Default::default() },
    ];

    check_all(&times, "'%d'",  &["'05'", "'25'"]);
    check_all(&times, "'%e'",  &["' 5'", "'25'"]);
    check_all(&times, "'%0e'", &["'05'", "'25'"]);
    check_all(&times, "'%H'",  &["'03'", "'13'"]);
    check_all(&times, "'%k'",  &["' 3'", "'13'"]);
    check_all(&times, "'%I'",  &["'03'", "'01'"]);
    check_all(&times, "'%l'",  &["' 3'", "' 1'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_meridian() {
    let times = [
        MockTime { hour: 11, ..Default::default() },
        MockTime { hour: 12, ..Default::default() },
    ];

    check_all(&times, "'%p'",  &["'AM'", "'PM'"]);
    check_all(&times, "'%P'",  &["'am'", "'pm'"]);
    check_all(&times, "'%#p'", &["'am'", "'pm'"]);
    check_all(&times, "'%^P'", &["'AM'", "'PM'"]);
}

#[test]
#[rustfmt::skip]
fn test_format_fractional_seconds() {
    let times = [MockTime { nanoseconds: 123_456_789, ..Default::default() }];

    check_all(&times, "'%L'",   &["'123'"]);
    check_all(&times, "'%N'",   &["'123456789'"]);
    check_all(&times, "'%3N'",  &["'123'"]);
    check_all(&times, "'%6N'",  &["'123456'"]);
    check_all(&times, "'%9N'",  &["'123456789'"]);
    check_all(&times, "'%12N'", &["'123456789000'"]);
    check_all(&times, "'%6L'",  &["'123456'"]);
}

#[test]
fn test_format_week_fields() {
    // 2022-07-08 was the Friday of ISO week 27.
    let time = MockTime {
        year: 2022,
        month: 7,
        day: 8,
        day_of_week: 5,
        day_of_year: 189,
        ..Default::default()
    };

    check_format(&time, "'%j'", "'189'");
    check_format(&time, "'%u'", "'5'");
    check_format(&time, "'%w'", "'5'");
    check_format(&time, "'%U'", "'27'");
    check_format(&time, "'%W'", "'27'");
    check_format(&time, "'%V'", "'27'");
    check_format(&time, "'%G'", "'2022'");
    check_format(&time, "'%g'", "'22'");
}

#[test]
fn test_format_week_fields_derived_from_civil_date() {
    // Same date, but with the weekday and ordinal left unsupported.
    let time = MockTime {
        year: 2022,
        month: 7,
        day: 8,
        ..Default::default()
    };
    let partial = PartialTime {
        inner: time,
        supported: &[
            TemporalField::Year,
            TemporalField::MonthOfYear,
            TemporalField::DayOfMonth,
        ],
    };

    let format = Format::compile("%a %j %V");
    assert_eq!(crate::format(&format, &partial), "Fri 189 27");
}

#[test]
fn test_format_epoch() {
    let time = MockTime {
        to_int: 86_400,
        nanoseconds: 123_456_789,
        ..Default::default()
    };

    check_format(&time, "'%s'", "'86400'");
    check_format(&time, "'%10s'", "'0000086400'");
    check_format(&time, "'%Q'", "'86400123'");

    let negative = MockTime {
        to_int: -12,
        ..Default::default()
    };
    check_format(&negative, "'%s'", "'-12'");
    check_format(&negative, "'%Q'", "'-12000'");
}

#[test]
fn test_format_combinations() {
    let time = MockTime::new(
        2022,
        7,
        8,
        13,
        18,
        19,
        123_456_789,
        5,
        189,
        1_657_282_699,
        3600,
        "CET",
    );

    check_format(&time, "'%c'", "'Fri Jul  8 13:18:19 2022'");
    check_format(&time, "'%D'", "'07/08/22'");
    check_format(&time, "'%x'", "'07/08/22'");
    check_format(&time, "'%F'", "'2022-07-08'");
    check_format(&time, "'%R'", "'13:18'");
    check_format(&time, "'%T'", "'13:18:19'");
    check_format(&time, "'%X'", "'13:18:19'");
    check_format(&time, "'%r'", "'01:18:19 PM'");
    check_format(&time, "'%v'", "' 8-Jul-2022'");
    check_format(&time, "'%+'", "'Fri Jul  8 13:18:19 CET 2022'");

    // The newline, tab, and percent directives pass through.
    check_format(&time, "a%nb%tc%%d", "a\nb\tc%d");
}

#[test]
fn test_format_missing_fields_render_empty() {
    let time = MockTime {
        year: 2022,
        month: 7,
        day: 8,
        hour: 13,
        ..Default::default()
    };
    let partial = PartialTime {
        inner: time,
        supported: &[TemporalField::Year, TemporalField::MonthOfYear],
    };

    let format = Format::compile("[%Y-%m-%d %H:%M %z %Z %s]");
    assert_eq!(crate::format(&format, &partial), "[2022-07- :   ]");
}

#[test]
fn test_format_out_of_range_fields_render_empty() {
    let time = MockTime {
        month: 13,
        hour: 25,
        ..Default::default()
    };

    check_format(&time, "[%B]", "[]");
    check_format(&time, "[%H]", "[]");
    check_format(&time, "[%p]", "[]");
}

#[test]
fn test_format_large_width() {
    let time = MockTime {
        year: 1970,
        month: 1,
        day: 1,
        day_of_week: 4,
        day_of_year: 1,
        ..Default::default()
    };

    check_format(&time, "%-100000000m", "1");
    check_format(&time, "%100000000000000000000m", "%100000000000000000000m");
}

#[test]
fn test_format_formatted_string_too_large_truncates() {
    let time = MockTime {
        month: 1,
        ..Default::default()
    };

    let format = Format::compile("%4718593m");
    let formatted = crate::format(&format, &time);
    assert_eq!(formatted.len(), 4_718_592);
}

#[test]
fn test_format_small_buffer() {
    let time = MockTime {
        year: 1970,
        ..Default::default()
    };

    let mut buf = [0u8; 3];
    let format = Format::compile("%Y");
    let result = crate::buffered::format(&format, &time, &mut buf);
    assert!(matches!(result, Err(Error::WriteZero)));
}

#[test]
fn test_format_roundtrips_literal_only_patterns() {
    let time = MockTime::default();

    for pattern in ["", "plain text", "100% pure", "newline\nand tab\t"] {
        let format = Format::compile(pattern);
        assert_eq!(crate::format(&format, &time), pattern);
    }
}
