//! Resolution of a [`Parsed`] record into an instant with offset.

use crate::civil;
use crate::strptime::parsed::{Epoch, Parsed};
use crate::strptime::{ParseError, ParseErrorKind};
use crate::{TemporalAccessor, TemporalField};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Caller-supplied defaults for [`Parsed::resolve`].
///
/// [`Parsed::resolve`]: crate::Parsed::resolve
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResolverOptions {
    /// Offset applied when the input carried no `%z`/`%Z`. Defaults to UTC.
    pub default_offset_seconds: i32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            default_offset_seconds: 0,
        }
    }
}

/// A resolved instant with offset, answering temporal-field queries for
/// both the instant and its local civil fields.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResolvedTimestamp {
    epoch_second: i64,
    nano_of_second: u32,
    offset_seconds: i32,
}

impl ResolvedTimestamp {
    /// Seconds since 1970-01-01T00:00:00Z.
    pub fn epoch_second(&self) -> i64 {
        self.epoch_second
    }

    /// Nanosecond-of-second in `0..=999_999_999`.
    pub fn nano_of_second(&self) -> u32 {
        self.nano_of_second
    }

    /// Offset from UTC in seconds.
    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }

    /// Local civil date and time-of-day at the stored offset.
    fn civil(&self) -> (i64, u32, u32, i64) {
        let local = self.epoch_second.saturating_add(i64::from(self.offset_seconds));
        let days = local.div_euclid(86_400);
        let second_of_day = local.rem_euclid(86_400);
        let (year, month, day) = civil::civil_from_days(days);
        (year, month, day, second_of_day)
    }
}

impl TemporalAccessor for ResolvedTimestamp {
    fn get_long(&self, field: TemporalField) -> i64 {
        match field {
            TemporalField::InstantSeconds => self.epoch_second,
            TemporalField::NanoOfSecond => self.nano_of_second.into(),
            TemporalField::OffsetSeconds => self.offset_seconds.into(),
            TemporalField::Year => self.civil().0,
            TemporalField::MonthOfYear => self.civil().1.into(),
            TemporalField::DayOfMonth => self.civil().2.into(),
            TemporalField::DayOfYear => {
                let (year, month, day, _) = self.civil();
                civil::day_of_year(year, month, day).into()
            }
            TemporalField::DayOfWeek => {
                let local = self.epoch_second + i64::from(self.offset_seconds);
                civil::weekday_from_days(local.div_euclid(86_400)).into()
            }
            TemporalField::HourOfDay => self.civil().3 / 3600,
            TemporalField::MinuteOfHour => self.civil().3 / 60 % 60,
            TemporalField::SecondOfMinute => self.civil().3 % 60,
        }
    }

    fn is_supported(&self, _field: TemporalField) -> bool {
        true
    }
}

/// Project a [`Parsed`] into a [`ResolvedTimestamp`].
///
/// An epoch directive wins over calendar fields; calendar fields win over
/// the 1970-01-01 default. See the crate documentation for the precedence
/// rules.
pub(crate) fn resolve(
    parsed: &Parsed,
    options: &ResolverOptions,
) -> Result<ResolvedTimestamp, ParseError> {
    let offset_seconds = parsed
        .offset_seconds()
        .unwrap_or(options.default_offset_seconds);

    let (epoch_second, nano_of_second) = match parsed.epoch() {
        Some(Epoch::Seconds(seconds)) => {
            // A fraction on a negative epoch counts away from zero:
            // "-1.5" is one and a half seconds before the epoch.
            let fraction = parsed.fraction_nanos();
            if seconds < 0 && fraction > 0 {
                let seconds = seconds
                    .checked_sub(1)
                    .ok_or_else(|| invalid(parsed, ParseErrorKind::NumericOverflow))?;
                (seconds, NANOS_PER_SECOND - fraction)
            } else {
                (seconds, fraction)
            }
        }
        Some(Epoch::Millis(millis)) => {
            let seconds = millis.div_euclid(1000);
            let mut nanos = millis.rem_euclid(1000) as u32 * 1_000_000 + parsed.fraction_nanos();
            let carry = i64::from(nanos / NANOS_PER_SECOND);
            nanos %= NANOS_PER_SECOND;
            let seconds = seconds
                .checked_add(carry)
                .ok_or_else(|| invalid(parsed, ParseErrorKind::NumericOverflow))?;
            (seconds, nanos)
        }
        None => resolve_civil(parsed, offset_seconds)?,
    };

    Ok(ResolvedTimestamp {
        epoch_second,
        nano_of_second,
        offset_seconds,
    })
}

/// Compute the instant from calendar fields, with the reference defaults:
/// missing date fields fall back to 1970-01-01, missing time fields to
/// midnight.
fn resolve_civil(parsed: &Parsed, offset_seconds: i32) -> Result<(i64, u32), ParseError> {
    let year = parsed.effective_year().unwrap_or(1970);
    let month = parsed.month().unwrap_or(1);
    let day = parsed.day_of_month().unwrap_or(1);
    let minute = parsed.minute().unwrap_or(0);
    let second = parsed.second().unwrap_or(0);
    let hour = parsed.effective_hour().unwrap_or(0);

    if !(-civil::MAX_YEAR..=civil::MAX_YEAR).contains(&year) {
        return Err(invalid(parsed, ParseErrorKind::NumericOverflow));
    }
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid(parsed, ParseErrorKind::InvalidCalendar));
    }
    if minute > 59 || second > 60 {
        return Err(invalid(parsed, ParseErrorKind::InvalidCalendar));
    }
    // Hour 24 is accepted for the stroke of midnight only.
    if hour > 24 || hour == 24 && (minute != 0 || second != 0) {
        return Err(invalid(parsed, ParseErrorKind::InvalidCalendar));
    }

    let days = civil::days_from_civil(year, month, day);
    // Hour 24 and the leap-second 60 roll over arithmetically.
    let second_of_day = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);

    let epoch_second = days
        .checked_mul(86_400)
        .and_then(|seconds| seconds.checked_add(second_of_day))
        .and_then(|seconds| seconds.checked_sub(offset_seconds.into()))
        .ok_or_else(|| invalid(parsed, ParseErrorKind::NumericOverflow))?;

    Ok((epoch_second, parsed.fraction_nanos()))
}

fn invalid(parsed: &Parsed, kind: ParseErrorKind) -> ParseError {
    ParseError {
        kind,
        index: parsed.original().len(),
        format: alloc::string::String::new(),
        input: alloc::string::String::from(parsed.original()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_default(parsed: &Parsed) -> Result<ResolvedTimestamp, ParseError> {
        resolve(parsed, &ResolverOptions::default())
    }

    #[test]
    fn test_epoch_defaults() {
        let parsed = Parsed::new();
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.epoch_second(), 0);
        assert_eq!(timestamp.nano_of_second(), 0);
    }

    #[test]
    fn test_negative_epoch_with_fraction_borrows() {
        let mut parsed = Parsed::new();
        parsed.epoch = Some(Epoch::Seconds(-1));
        parsed.nano_of_second = Some(500_000_000);
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.epoch_second(), -2);
        assert_eq!(timestamp.nano_of_second(), 500_000_000);
    }

    #[test]
    fn test_negative_millis_wrap() {
        let mut parsed = Parsed::new();
        parsed.epoch = Some(Epoch::Millis(-1));
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.epoch_second(), -1);
        assert_eq!(timestamp.nano_of_second(), 999_000_000);
    }

    #[test]
    fn test_leap_second_rolls_over() {
        let mut parsed = Parsed::new();
        parsed.year = Some(2008);
        parsed.month = Some(12);
        parsed.day_of_month = Some(31);
        parsed.hour = Some(23);
        parsed.minute = Some(59);
        parsed.second = Some(60);
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.epoch_second(), 1_230_768_000);
    }

    #[test]
    fn test_hour_24_is_midnight_only() {
        let mut parsed = Parsed::new();
        parsed.year = Some(1970);
        parsed.hour = Some(24);
        assert_eq!(resolve_default(&parsed).unwrap().epoch_second(), 86_400);

        parsed.minute = Some(1);
        let error = resolve_default(&parsed).unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::InvalidCalendar);
    }

    #[test]
    fn test_malformed_calendar_rejected() {
        let mut parsed = Parsed::new();
        parsed.month = Some(13);
        assert_eq!(
            resolve_default(&parsed).unwrap_err().kind(),
            ParseErrorKind::InvalidCalendar
        );

        let mut parsed = Parsed::new();
        parsed.day_of_month = Some(32);
        assert_eq!(
            resolve_default(&parsed).unwrap_err().kind(),
            ParseErrorKind::InvalidCalendar
        );

        // Range-only day validity: Feb 30 extrapolates into March.
        let mut parsed = Parsed::new();
        parsed.year = Some(1970);
        parsed.month = Some(2);
        parsed.day_of_month = Some(30);
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.get_long(TemporalField::MonthOfYear), 3);
        assert_eq!(timestamp.get_long(TemporalField::DayOfMonth), 2);
    }

    #[test]
    fn test_offset_applies_to_instant() {
        let mut parsed = Parsed::new();
        parsed.year = Some(2003);
        parsed.month = Some(2);
        parsed.day_of_month = Some(1);
        parsed.hour = Some(16);
        parsed.offset_seconds = Some(18_000);
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.epoch_second(), 1_044_097_200);
        assert_eq!(timestamp.offset_seconds(), 18_000);
        // Local fields are unchanged by the offset.
        assert_eq!(timestamp.get_long(TemporalField::HourOfDay), 16);
    }

    #[test]
    fn test_resolved_civil_fields() {
        let mut parsed = Parsed::new();
        parsed.epoch = Some(Epoch::Seconds(1_500_000_000));
        let timestamp = resolve_default(&parsed).unwrap();
        assert_eq!(timestamp.get_long(TemporalField::Year), 2017);
        assert_eq!(timestamp.get_long(TemporalField::MonthOfYear), 7);
        assert_eq!(timestamp.get_long(TemporalField::DayOfMonth), 14);
        assert_eq!(timestamp.get_long(TemporalField::HourOfDay), 2);
        assert_eq!(timestamp.get_long(TemporalField::MinuteOfHour), 40);
        assert_eq!(timestamp.get_long(TemporalField::SecondOfMinute), 0);
        assert_eq!(timestamp.get_long(TemporalField::DayOfWeek), 5);
    }
}
