use crate::{Format, ParseErrorKind, ResolverOptions};

fn parse_instant(pattern: &str, input: &str) -> (i64, u32) {
    let format = Format::compile(pattern);
    let timestamp = crate::parse(&format, input, &ResolverOptions::default())
        .unwrap_or_else(|error| panic!("{}", error));
    (timestamp.epoch_second(), timestamp.nano_of_second())
}

fn parse_err(pattern: &str, input: &str) -> crate::ParseError {
    let format = Format::compile(pattern);
    crate::parse(&format, input, &ResolverOptions::default()).unwrap_err()
}

fn parse_fields(pattern: &str, input: &str) -> crate::Parsed {
    let format = Format::compile(pattern);
    crate::parse_unresolved(&format, input).unwrap_or_else(|error| panic!("{}", error))
}

#[test]
fn test_epoch_with_fraction() {
    assert_eq!(
        parse_instant("%s.%N", "1500000000.123456789"),
        (1_500_000_000, 123_456_789)
    );
    assert_eq!(parse_instant("%s.%N", "-1.5"), (-2, 500_000_000));
    assert_eq!(parse_instant("%s.%L", "0.25"), (0, 250_000_000));
}

#[test]
fn test_epoch_millis_recombine_with_fraction() {
    assert_eq!(
        parse_instant("%Q.%N", "1500000000456.111111111"),
        (1_500_000_000, 567_111_111)
    );
    assert_eq!(parse_instant("%Q", "-1"), (-1, 999_000_000));
}

#[test]
fn test_multiple_epochs_last_wins() {
    assert_eq!(
        parse_instant("%Q %s", "123456789 12849124"),
        (12_849_124, 0)
    );
    assert_eq!(
        parse_instant("%s %Q", "123456789 12849124"),
        (12_849, 124_000_000)
    );
}

#[test]
fn test_leap_second_rolls_over() {
    assert_eq!(
        parse_instant("%Y-%m-%dT%H:%M:%S", "2008-12-31T23:59:60"),
        (1_230_768_000, 0)
    );
}

#[test]
fn test_rfc_like_input_with_zone() {
    assert_eq!(
        parse_instant("%a, %d %b %Y %H:%M:%S %Z", "Thu, 29 Jul 1999 09:54:21 PDT"),
        (933_267_261, 0)
    );
}

#[test]
fn test_compact_input_without_separators() {
    assert_eq!(
        parse_instant("%a%d%b%y%H%p%Z", "fri1feb034pm+05"),
        (1_044_097_200, 0)
    );
}

#[test]
fn test_month_name_prefix_quirk() {
    let parsed = parse_fields("%B", "Januari");
    assert_eq!(parsed.month(), Some(1));
    assert_eq!(parsed.leftover(), Some("uari"));

    let parsed = parse_fields("%A", "Sundai");
    assert_eq!(parsed.day_of_week(), Some(0));
    assert_eq!(parsed.leftover(), Some("dai"));

    // Full names win over their prefixes.
    let parsed = parse_fields("%B", "JANUARY");
    assert_eq!(parsed.month(), Some(1));
    assert_eq!(parsed.leftover(), None);
}

#[test]
fn test_year_digit_run_is_bounded_by_number_patterns() {
    let parsed = parse_fields("%Y%m%d", "20220708");
    assert_eq!(parsed.year(), Some(2022));
    assert_eq!(parsed.month(), Some(7));
    assert_eq!(parsed.day_of_month(), Some(8));

    // Without a following number pattern the run is greedy.
    let parsed = parse_fields("%Y", "123456");
    assert_eq!(parsed.year(), Some(123_456));

    let parsed = parse_fields("%Y", "-0094");
    assert_eq!(parsed.year(), Some(-94));
}

#[test]
fn test_two_digit_year_pivot() {
    assert_eq!(parse_fields("%y", "69").year_of_century(), Some(69));
    assert_eq!(parse_instant("%y", "69").0, -31_536_000);
    assert_eq!(parse_instant("%y", "03").0, 1_041_379_200);
    // An explicit century overrides the pivot.
    assert_eq!(parse_instant("%C%y", "1903").0, -2_114_380_800);
}

#[test]
fn test_blank_padded_numbers_skip_one_space() {
    let parsed = parse_fields("%e", " 5");
    assert_eq!(parsed.day_of_month(), Some(5));

    let parsed = parse_fields("%d%H", " 512");
    assert_eq!(parsed.day_of_month(), Some(5));
    assert_eq!(parsed.hour(), Some(12));
}

#[test]
fn test_pattern_whitespace_matches_nonzero_run() {
    let parsed = parse_fields("%Y %m", "2022    7");
    assert_eq!(parsed.month(), Some(7));

    let error = parse_err("%Y %m", "2022x07");
    assert_eq!(error.kind(), ParseErrorKind::UnmatchedLiteral);
    assert_eq!(error.index(), 4);
}

#[test]
fn test_surplus_trailing_pattern_is_leniently_ignored() {
    let parsed = parse_fields("%Y quarter", "2022");
    assert_eq!(parsed.year(), Some(2022));
    assert_eq!(parsed.leftover(), None);

    // Surplus field directives still fail.
    let error = parse_err("%Y-%m", "2022");
    assert_eq!(error.kind(), ParseErrorKind::ExpectedDigits);
}

#[test]
fn test_leftover_and_original_are_recorded() {
    let parsed = parse_fields("%Y-%m-%d", "2022-07-08 09:30");
    assert_eq!(parsed.leftover(), Some(" 09:30"));
    assert_eq!(parsed.original(), "2022-07-08 09:30");
}

#[test]
fn test_meridian_forms() {
    assert_eq!(parse_instant("%I:%M %p", "09:30 PM").0, 77_400);
    assert_eq!(parse_instant("%I:%M %p", "09:30 p.m.").0, 77_400);
    assert_eq!(parse_instant("%I:%M %p", "12:00 am").0, 0);
    assert_eq!(parse_instant("%H %p", "16 PM").0, 57_600);
}

#[test]
fn test_day_of_week_numbers() {
    assert_eq!(parse_fields("%u", "7").day_of_week(), Some(0));
    assert_eq!(parse_fields("%u", "1").day_of_week(), Some(1));
    assert_eq!(parse_fields("%w", "0").day_of_week(), Some(0));
}

#[test]
fn test_numeric_offsets() {
    assert_eq!(parse_fields("%z", "+0930").offset_seconds(), Some(34_200));
    assert_eq!(parse_fields("%z", "-05:30").offset_seconds(), Some(-19_800));
    assert_eq!(parse_fields("%z", "Z").offset_seconds(), Some(0));
    assert_eq!(
        parse_fields("%z", "UTC+19.5").offset_seconds(),
        Some(70_200)
    );
}

#[test]
fn test_zone_names_resolve_and_record_text() {
    let parsed = parse_fields("%Z", "Cen. Australia Standard Time");
    assert_eq!(parsed.zone(), Some("Cen. Australia Standard Time"));
    assert_eq!(parsed.offset_seconds(), Some(34_200));

    // A shaped but unknown abbreviation keeps its text with no offset.
    let parsed = parse_fields("%Z", "XYZT");
    assert_eq!(parsed.zone(), Some("XYZT"));
    assert_eq!(parsed.offset_seconds(), None);
}

#[test]
fn test_zone_errors() {
    let error = parse_err("%Z", "123");
    assert_eq!(error.kind(), ParseErrorKind::UnrecognizedZone);

    let error = parse_err("%Z", "UTC+19.001953125");
    assert_eq!(error.kind(), ParseErrorKind::FractionTooPrecise);
    assert_eq!(error.index(), 0);
}

#[test]
fn test_unmatched_literal_position() {
    let error = parse_err("%Y-%m", "2022/07");
    assert_eq!(error.kind(), ParseErrorKind::UnmatchedLiteral);
    assert_eq!(error.index(), 4);
    assert_eq!(error.input(), "2022/07");
    assert_eq!(error.format(), "%Y-%m");

    let error = parse_err("%m", "abc");
    assert_eq!(error.kind(), ParseErrorKind::ExpectedDigits);
    assert_eq!(error.index(), 0);
}

#[test]
fn test_literals_are_case_sensitive() {
    assert!(crate::parse_unresolved(&Format::compile("UTC%H"), "utc12").is_err());
    assert_eq!(parse_fields("UTC%H", "UTC12").hour(), Some(12));
}

#[test]
fn test_epoch_overflow() {
    let error = parse_err("%s", "9999999999999999999");
    assert_eq!(error.kind(), ParseErrorKind::NumericOverflow);
}

#[test]
fn test_malformed_calendar_parses_but_fails_resolution() {
    let parsed = parse_fields("%Y-%m-%d", "2022-13-32");
    assert_eq!(parsed.month(), Some(13));
    assert_eq!(parsed.day_of_month(), Some(32));

    let error = parse_err("%Y-%m-%d", "2022-13-01");
    assert_eq!(error.kind(), ParseErrorKind::InvalidCalendar);
    assert_eq!(error.format(), "%Y-%m-%d");
}

#[test]
fn test_hour_24_at_midnight() {
    assert_eq!(parse_instant("%H:%M:%S", "24:00:00").0, 86_400);

    let error = parse_err("%H:%M:%S", "24:00:01");
    assert_eq!(error.kind(), ParseErrorKind::InvalidCalendar);
}

#[test]
fn test_recurred_directives_parse_their_expansion() {
    let parsed = parse_fields("%F", "2022-07-08");
    assert_eq!(parsed.year(), Some(2022));
    assert_eq!(parsed.month(), Some(7));
    assert_eq!(parsed.day_of_month(), Some(8));

    let parsed = parse_fields("%T", "13:18:19");
    assert_eq!(parsed.hour(), Some(13));
    assert_eq!(parsed.minute(), Some(18));
    assert_eq!(parsed.second(), Some(19));

    let parsed = parse_fields("%c", "Fri Jul  8 13:18:19 2022");
    assert_eq!(parsed.year(), Some(2022));
    assert_eq!(parsed.day_of_week(), Some(5));
}

#[test]
fn test_parser_ignores_formatter_options() {
    // Width, padding, and case flags do not change parsing.
    let parsed = parse_fields("%-5Y/%^B", "2022/july");
    assert_eq!(parsed.year(), Some(2022));
    assert_eq!(parsed.month(), Some(7));
}

#[test]
fn test_default_offset_applies_when_zone_is_absent() {
    let format = Format::compile("%Y-%m-%d %H:%M:%S");
    let options = ResolverOptions {
        default_offset_seconds: -18_000,
    };
    let timestamp = crate::parse(&format, "1970-01-01 00:00:00", &options).unwrap();
    assert_eq!(timestamp.epoch_second(), 18_000);
    assert_eq!(timestamp.offset_seconds(), -18_000);

    // A parsed zone wins over the default.
    let format = Format::compile("%Y-%m-%d %H:%M:%S %Z");
    let timestamp = crate::parse(&format, "1970-01-01 00:00:00 GMT", &options).unwrap();
    assert_eq!(timestamp.epoch_second(), 0);
}

#[test]
fn test_fraction_truncates_excess_digits() {
    let parsed = parse_fields("%N", "1234567891234");
    assert_eq!(parsed.nano_of_second(), Some(123_456_789));
    assert_eq!(parsed.leftover(), None);

    let parsed = parse_fields("%L", "9876");
    assert_eq!(parsed.milli_of_second(), Some(987));

    // Short runs scale up.
    let parsed = parse_fields("%N", "5");
    assert_eq!(parsed.nano_of_second(), Some(500_000_000));
}
