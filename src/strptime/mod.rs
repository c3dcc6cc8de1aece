//! Parsing engine: drives a compiled format against an input string,
//! populating a [`Parsed`] accumulator.

mod parsed;
mod resolve;

use alloc::string::{String, ToString};
use core::fmt;
use core::str;

use crate::format::{Directive, FieldKind, Format, FormatToken};
use crate::strftime::{DAYS, MONTHS};
use crate::utils::Cursor;
use crate::zone::{zone_to_offset, ZoneDiffError};

pub use self::parsed::{
    Decimal, Element, ElementsWithFractionInDecimal, ElementsWithFractionInRational, Epoch,
    Meridian, Parsed, ParsedQuery, Rational,
};
pub use self::resolve::{ResolvedTimestamp, ResolverOptions};

impl Parsed {
    /// Resolve the parsed fields into an instant with offset.
    ///
    /// # Errors
    ///
    /// Fails when the fields are mutually inconsistent or outside the
    /// ranges the resolver accepts.
    pub fn resolve(&self, options: &ResolverOptions) -> Result<ResolvedTimestamp, ParseError> {
        resolve::resolve(self, options)
    }
}

/// Kind of a parse failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    /// An immediate token did not match the input.
    UnmatchedLiteral,
    /// A numeric directive found no digits to consume.
    ExpectedDigits,
    /// `%z`/`%Z` found nothing shaped like a zone.
    UnrecognizedZone,
    /// A numeric field does not fit its 64-bit slot.
    NumericOverflow,
    /// A fractional-hour offset finer than the supported precision.
    FractionTooPrecise,
    /// The resolver rejected the parsed calendar fields.
    InvalidCalendar,
}

/// Structured parse failure: what went wrong, where, and against what.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
    pub(crate) index: usize,
    pub(crate) format: String,
    pub(crate) input: String,
}

impl ParseError {
    /// Kind of the failure.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Byte index in the input where the failure was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The source pattern of the format being matched.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The input being parsed.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn with_format(mut self, format: &Format) -> Self {
        if self.format.is_empty() {
            self.format = format.to_string();
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            ParseErrorKind::UnmatchedLiteral => "input does not match the format",
            ParseErrorKind::ExpectedDigits => "expected digits",
            ParseErrorKind::UnrecognizedZone => "expected a time zone",
            ParseErrorKind::NumericOverflow => "numeric field out of range",
            ParseErrorKind::FractionTooPrecise => "offset fraction too precise",
            ParseErrorKind::InvalidCalendar => "calendar fields do not form a date",
        };
        write!(
            f,
            "{} at byte {} while parsing {:?} with format {:?}",
            reason, self.index, self.input, self.format
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Parsing engine over a compiled format and an input string.
pub(crate) struct TimeParser<'f, 'i> {
    format: &'f Format,
    input: &'i str,
    cursor: Cursor<'i>,
    parsed: Parsed,
}

impl<'f, 'i> TimeParser<'f, 'i> {
    pub(crate) fn new(format: &'f Format, input: &'i str) -> Self {
        Self {
            format,
            input,
            cursor: Cursor::new(input.as_bytes()),
            parsed: Parsed::new(),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Parsed, ParseError> {
        let format = self.format;
        self.run(format.tokens())?;

        self.parsed.original = String::from(self.input);
        let remaining = self.cursor.remaining();
        if !remaining.is_empty() {
            let leftover =
                str::from_utf8(remaining).expect("directives consume whole characters");
            self.parsed.leftover = Some(String::from(leftover));
        }

        Ok(self.parsed)
    }

    fn run(&mut self, tokens: &[FormatToken]) -> Result<(), ParseError> {
        for (index, token) in tokens.iter().enumerate() {
            match token {
                FormatToken::Immediate(text) => self.match_literal(text)?,
                FormatToken::Directive { directive, .. } => {
                    let bounded = next_is_number_pattern(tokens, index + 1);
                    self.parse_directive(*directive, bounded)?;
                }
            }
        }
        Ok(())
    }

    fn position(&self) -> usize {
        self.input.len() - self.cursor.remaining().len()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.position())
    }

    fn error_at(&self, kind: ParseErrorKind, index: usize) -> ParseError {
        ParseError {
            kind,
            index,
            format: self.format.to_string(),
            input: String::from(self.input),
        }
    }

    /// Match literal text. A whitespace run in the pattern matches a
    /// nonzero whitespace run in the input. Pattern text left over once
    /// the input is exhausted matches vacuously.
    fn match_literal(&mut self, text: &str) -> Result<(), ParseError> {
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i].is_ascii_whitespace() {
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                self.match_whitespace_run()?;
            } else {
                if self.cursor.remaining().is_empty() {
                    return Ok(());
                }
                if self.cursor.peek() != Some(bytes[i]) {
                    return Err(self.error(ParseErrorKind::UnmatchedLiteral));
                }
                self.cursor.next();
                i += 1;
            }
        }
        Ok(())
    }

    fn match_whitespace_run(&mut self) -> Result<(), ParseError> {
        if self.cursor.remaining().is_empty() {
            return Ok(());
        }
        if self.cursor.read_while(u8::is_ascii_whitespace).is_empty() {
            return Err(self.error(ParseErrorKind::UnmatchedLiteral));
        }
        Ok(())
    }

    fn parse_directive(&mut self, directive: Directive, bounded: bool) -> Result<(), ParseError> {
        match directive.field_kind() {
            FieldKind::Numeric { max_digits } => {
                let value = self.read_number(directive, max_digits)?;
                self.store_numeric(directive, value);
                Ok(())
            }
            FieldKind::SignedYear => {
                let value = self.read_signed(if bounded { 4 } else { 19 })?;
                match directive {
                    Directive::WeekBasedYearWithCentury => {
                        self.parsed.week_based_year = Some(value);
                    }
                    _ => self.parsed.year = Some(value),
                }
                Ok(())
            }
            FieldKind::Epoch { millis } => {
                let value = self.read_signed(19)?;
                self.parsed.epoch = Some(if millis {
                    Epoch::Millis(value)
                } else {
                    Epoch::Seconds(value)
                });
                Ok(())
            }
            FieldKind::Fraction { digits } => {
                self.read_fraction(directive, digits);
                Ok(())
            }
            FieldKind::Text => self.match_name(directive),
            FieldKind::Meridian => self.match_meridian(),
            FieldKind::Zone => self.match_zone(),
            FieldKind::Literal(text) => self.match_literal(text),
            FieldKind::Recurred(expansion) => {
                let expanded = Format::compile(expansion);
                self.run(expanded.tokens())
            }
        }
    }

    /// Read an unsigned numeric field. Blank-padded fields accept one
    /// leading space in place of a digit.
    fn read_number(&mut self, directive: Directive, max_digits: usize) -> Result<u32, ParseError> {
        let max_digits = if accepts_leading_space(directive)
            && self.cursor.peek() == Some(b' ')
            && max_digits > 1
        {
            self.cursor.next();
            max_digits - 1
        } else {
            max_digits
        };

        let digits = self.cursor.read_digits(max_digits);
        if digits.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedDigits));
        }

        let mut value: u32 = 0;
        for &digit in digits {
            value = value * 10 + u32::from(digit - b'0');
        }
        Ok(value)
    }

    /// Read a signed digit run of up to `max_digits` digits.
    fn read_signed(&mut self, max_digits: usize) -> Result<i64, ParseError> {
        let negative = match self.cursor.peek() {
            Some(b'-') => {
                self.cursor.next();
                true
            }
            Some(b'+') => {
                self.cursor.next();
                false
            }
            _ => false,
        };

        let digits = self.cursor.read_digits(max_digits);
        if digits.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedDigits));
        }

        let mut value: i64 = 0;
        for &digit in digits {
            value = value
                .checked_mul(10)
                .and_then(|value| value.checked_add(i64::from(digit - b'0')))
                .ok_or_else(|| self.error(ParseErrorKind::NumericOverflow))?;
        }
        Ok(if negative { -value } else { value })
    }

    /// Read a fractional-second digit run. An empty run leaves the field
    /// absent; digits beyond the directive's precision are consumed and
    /// truncated, never rounded.
    fn read_fraction(&mut self, directive: Directive, precision: u32) {
        let digits = self.cursor.read_while(u8::is_ascii_digit);
        if digits.is_empty() {
            return;
        }

        let significant = digits.len().min(precision as usize);
        let mut value: u32 = 0;
        for &digit in &digits[..significant] {
            value = value * 10 + u32::from(digit - b'0');
        }
        value *= 10u32.pow(precision - significant as u32);

        match directive {
            Directive::MilliOfSecond => self.parsed.milli_of_second = Some(value),
            _ => self.parsed.nano_of_second = Some(value),
        }
    }

    fn store_numeric(&mut self, directive: Directive, value: u32) {
        match directive {
            Directive::Century => self.parsed.century = Some(value.into()),
            Directive::YearWithoutCentury => self.parsed.year_of_century = Some(value.into()),
            Directive::MonthOfYear => self.parsed.month = Some(value),
            Directive::DayOfMonthZeroPadded | Directive::DayOfMonthBlankPadded => {
                self.parsed.day_of_month = Some(value);
            }
            Directive::DayOfYear => self.parsed.day_of_year = Some(value),
            Directive::HourOfDayZeroPadded
            | Directive::HourOfDayBlankPadded
            | Directive::HourOfAmPmZeroPadded
            | Directive::HourOfAmPmBlankPadded => self.parsed.hour = Some(value),
            Directive::MinuteOfHour => self.parsed.minute = Some(value),
            Directive::SecondOfMinute => self.parsed.second = Some(value),
            Directive::WeekBasedYearWithoutCentury => {
                self.parsed.week_based_year_of_century = Some(value.into());
            }
            Directive::WeekOfWeekBasedYear => {
                self.parsed.week_of_week_based_year = Some(value);
            }
            Directive::WeekOfYearFromSunday => self.parsed.week_of_year_sunday = Some(value),
            Directive::WeekOfYearFromMonday => self.parsed.week_of_year_monday = Some(value),
            Directive::DayOfWeekFromMonday => self.parsed.day_of_week = Some(value % 7),
            Directive::DayOfWeekFromSunday => self.parsed.day_of_week = Some(value),
            _ => unreachable!("directive is not a fixed-width numeric field"),
        }
    }

    /// Match a month or weekday name: the full English name, or its
    /// three-letter prefix. The prefix fallback is what lets `Januari`
    /// parse as January with `uari` left over.
    fn match_name(&mut self, directive: Directive) -> Result<(), ParseError> {
        let months = matches!(
            directive,
            Directive::MonthOfYearFullName | Directive::MonthOfYearAbbreviatedName
        );
        let names: &[&str] = if months { &MONTHS } else { &DAYS };

        for (index, name) in names.iter().enumerate() {
            let matched = self.cursor.read_optional_tag_no_case(name.as_bytes())
                || self.cursor.read_optional_tag_no_case(&name.as_bytes()[..3]);
            if matched {
                if months {
                    self.parsed.month = Some(index as u32 + 1);
                } else {
                    self.parsed.day_of_week = Some(index as u32);
                }
                return Ok(());
            }
        }
        Err(self.error(ParseErrorKind::UnmatchedLiteral))
    }

    /// Match `AM`/`PM`/`A.M.`/`P.M.`, case-insensitively. The bare form
    /// requires a word boundary, so `AMERICA` is not a meridian.
    fn match_meridian(&mut self) -> Result<(), ParseError> {
        let remaining = self.cursor.remaining();

        for (dotted, bare, meridian) in [
            (b"a.m.".as_ref(), b"am".as_ref(), Meridian::Am),
            (b"p.m.".as_ref(), b"pm".as_ref(), Meridian::Pm),
        ] {
            if self.cursor.read_optional_tag_no_case(dotted) {
                self.parsed.am_pm = Some(meridian);
                return Ok(());
            }
            if remaining.len() >= bare.len()
                && remaining[..bare.len()].eq_ignore_ascii_case(bare)
                && is_word_boundary(remaining, bare.len())
            {
                self.cursor.read_exact(bare.len());
                self.parsed.am_pm = Some(meridian);
                return Ok(());
            }
        }
        Err(self.error(ParseErrorKind::UnmatchedLiteral))
    }

    /// Match the longest input run shaped like a zone, then resolve it.
    /// A shaped-but-unknown abbreviation keeps its text with no offset.
    fn match_zone(&mut self) -> Result<(), ParseError> {
        let start = self.position();
        let remaining = self.cursor.remaining();

        let len = match_zone_shape(remaining)
            .ok_or_else(|| self.error(ParseErrorKind::UnrecognizedZone))?;
        let text = str::from_utf8(&remaining[..len]).expect("zone shapes are ASCII");
        self.cursor.read_exact(len);

        match zone_to_offset(text) {
            Ok(offset) => self.parsed.offset_seconds = Some(offset),
            Err(ZoneDiffError::NotAZone) => {}
            Err(ZoneDiffError::FractionTooPrecise) => {
                return Err(self.error_at(ParseErrorKind::FractionTooPrecise, start));
            }
        }
        self.parsed.zone = Some(String::from(text));
        Ok(())
    }
}

/// Whether the next token starts by consuming digits, which bounds the
/// greedy `%Y`/`%G` runs.
fn next_is_number_pattern(tokens: &[FormatToken], index: usize) -> bool {
    match tokens.get(index) {
        Some(FormatToken::Immediate(text)) => text.as_bytes()[0].is_ascii_digit(),
        Some(FormatToken::Directive { directive, .. }) => directive.starts_numeric(),
        None => false,
    }
}

/// Blank-padded numeric directives accept one leading space.
fn accepts_leading_space(directive: Directive) -> bool {
    matches!(
        directive,
        Directive::DayOfMonthZeroPadded
            | Directive::DayOfMonthBlankPadded
            | Directive::HourOfDayZeroPadded
            | Directive::HourOfDayBlankPadded
            | Directive::HourOfAmPmZeroPadded
            | Directive::HourOfAmPmBlankPadded
    )
}

/// Longest prefix of the input shaped like a zone: a (possibly
/// `GMT`/`UTC`-prefixed) signed numeric offset, a name ending in
/// `standard time`/`daylight time`, or a plain alphabetic name with an
/// optional ` dst` tail.
fn match_zone_shape(input: &[u8]) -> Option<usize> {
    match_numeric_shape(input)
        .or_else(|| match_suffixed_name_shape(input))
        .or_else(|| match_plain_name_shape(input))
}

fn match_numeric_shape(input: &[u8]) -> Option<usize> {
    let mut i = 0;
    for prefix in [b"gmt".as_ref(), b"utc".as_ref(), b"ut".as_ref()] {
        if input.len() >= prefix.len() && input[..prefix.len()].eq_ignore_ascii_case(prefix) {
            i = prefix.len();
            break;
        }
    }

    match input.get(i) {
        Some(b'+') | Some(b'-') => i += 1,
        _ => return None,
    }

    let hour_digits = digit_run(input, i);
    if hour_digits == 0 {
        return None;
    }
    i += hour_digits;

    if matches!(input.get(i), Some(b',') | Some(b'.') | Some(b':')) {
        let minute_digits = digit_run(input, i + 1);
        if minute_digits > 0 {
            i += 1 + minute_digits;
            if input.get(i) == Some(&b':') {
                let second_digits = digit_run(input, i + 1);
                if second_digits > 0 {
                    i += 1 + second_digits;
                }
            }
        }
    }

    Some(i)
}

fn match_suffixed_name_shape(input: &[u8]) -> Option<usize> {
    const TIME: usize = "time".len();

    let run_len = input
        .iter()
        .take_while(|&&x| x.is_ascii_alphabetic() || x == b'.' || x.is_ascii_whitespace())
        .count();
    let run = &input[..run_len];

    // Take the longest span ending in `(standard|daylight)\s+time` at a
    // word boundary, with at least one name character before the keyword.
    for end in (TIME..=run_len).rev() {
        if !is_word_boundary(input, end) || !run[end - TIME..end].eq_ignore_ascii_case(b"time") {
            continue;
        }

        let space_end = end - TIME;
        let mut keyword_end = space_end;
        while keyword_end > 0 && run[keyword_end - 1].is_ascii_whitespace() {
            keyword_end -= 1;
        }
        if keyword_end == space_end {
            continue;
        }

        for keyword in [b"standard".as_ref(), b"daylight".as_ref()] {
            if keyword_end > keyword.len()
                && run[keyword_end - keyword.len()..keyword_end].eq_ignore_ascii_case(keyword)
            {
                return Some(end);
            }
        }
    }
    None
}

fn match_plain_name_shape(input: &[u8]) -> Option<usize> {
    let alpha = input.iter().take_while(|&&x| x.is_ascii_alphabetic()).count();
    if alpha == 0 {
        return None;
    }

    let spaces = input[alpha..]
        .iter()
        .take_while(|&&x| x.is_ascii_whitespace())
        .count();
    if spaces > 0 {
        let end = alpha + spaces + "dst".len();
        if input.len() >= end
            && input[alpha + spaces..end].eq_ignore_ascii_case(b"dst")
            && is_word_boundary(input, end)
        {
            return Some(end);
        }
    }

    if is_word_boundary(input, alpha) {
        Some(alpha)
    } else {
        None
    }
}

fn digit_run(input: &[u8], start: usize) -> usize {
    match input.get(start..) {
        Some(rest) => rest.iter().take_while(|x| x.is_ascii_digit()).count(),
        None => 0,
    }
}

fn is_word_boundary(input: &[u8], index: usize) -> bool {
    match input.get(index) {
        Some(&x) => !(x.is_ascii_alphanumeric() || x == b'_'),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(input: &str) -> Option<&str> {
        let len = match_zone_shape(input.as_bytes())?;
        Some(&input[..len])
    }

    #[test]
    fn test_numeric_zone_shapes() {
        assert_eq!(shape("+05"), Some("+05"));
        assert_eq!(shape("+05abc"), Some("+05"));
        assert_eq!(shape("-09:30:15 x"), Some("-09:30:15"));
        assert_eq!(shape("GMT+9"), Some("GMT+9"));
        assert_eq!(shape("utc+19.5!"), Some("utc+19.5"));
        assert_eq!(shape("UT-5,25"), Some("UT-5,25"));
    }

    #[test]
    fn test_name_zone_shapes() {
        assert_eq!(shape("PDT"), Some("PDT"));
        assert_eq!(shape("PST8PDT"), None);
        assert_eq!(shape("CET rest"), Some("CET"));
        assert_eq!(shape("pacific dst,"), Some("pacific dst"));
        assert_eq!(
            shape("Cen. Australia Standard Time next"),
            Some("Cen. Australia Standard Time")
        );
        assert_eq!(shape("pacific daylight time"), Some("pacific daylight time"));
        // Without a name before the keyword, only the plain branch fits.
        assert_eq!(shape("standard time"), Some("standard"));
        assert_eq!(shape("UTC"), Some("UTC"));
        assert_eq!(shape("123"), None);
    }
}
