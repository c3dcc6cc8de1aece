//! Formatting engine: renders a compiled format against a temporal
//! accessor.

mod utils;
mod week;
pub(crate) mod write;

use core::fmt;

use crate::assert::assert_to_ascii_uppercase;
use crate::civil;
use crate::format::{Directive, DirectiveOptions, Flags, Format, FormatToken, Padding};
use crate::strftime::utils::{Lower, SizeLimiter, Upper};
use crate::strftime::week::{iso_week_based_year_and_week, week_number, WeekStart};
use crate::strftime::write::Write;
use crate::{Error, TemporalAccessor, TemporalField};

/// List of weekday names.
pub(crate) const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// List of uppercase weekday names.
const DAYS_UPPER: [&str; 7] = [
    "SUNDAY",
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
];

/// List of month names.
pub(crate) const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// List of uppercase month names.
const MONTHS_UPPER: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

// Check day and month tables
const _: () = {
    assert_to_ascii_uppercase(&DAYS, &DAYS_UPPER);
    assert_to_ascii_uppercase(&MONTHS, &MONTHS_UPPER);
};

/// Field access with the empty-substitution policy: a missing or
/// out-of-range field yields `None`, and the directive renders nothing.
struct Fields<'t, T: ?Sized>(&'t T);

impl<T: TemporalAccessor + ?Sized> Fields<'_, T> {
    fn get(&self, field: TemporalField) -> Option<i64> {
        if self.0.is_supported(field) {
            Some(self.0.get_long(field))
        } else {
            None
        }
    }

    fn year(&self) -> Option<i64> {
        self.get(TemporalField::Year)
    }

    fn month(&self) -> Option<u8> {
        match self.get(TemporalField::MonthOfYear)? {
            month @ 1..=12 => Some(month as u8),
            _ => None,
        }
    }

    fn day(&self) -> Option<u8> {
        match self.get(TemporalField::DayOfMonth)? {
            day @ 1..=31 => Some(day as u8),
            _ => None,
        }
    }

    fn hour(&self) -> Option<u8> {
        match self.get(TemporalField::HourOfDay)? {
            hour @ 0..=23 => Some(hour as u8),
            _ => None,
        }
    }

    fn minute(&self) -> Option<u8> {
        match self.get(TemporalField::MinuteOfHour)? {
            minute @ 0..=59 => Some(minute as u8),
            _ => None,
        }
    }

    fn second(&self) -> Option<u8> {
        match self.get(TemporalField::SecondOfMinute)? {
            second @ 0..=60 => Some(second as u8),
            _ => None,
        }
    }

    fn nanoseconds(&self) -> Option<u32> {
        match self.get(TemporalField::NanoOfSecond)? {
            nanoseconds @ 0..=999_999_999 => Some(nanoseconds as u32),
            _ => None,
        }
    }

    fn bounded_year(&self) -> Option<i64> {
        match self.year()? {
            year if (-civil::MAX_YEAR..=civil::MAX_YEAR).contains(&year) => Some(year),
            _ => None,
        }
    }

    fn day_of_week(&self) -> Option<u8> {
        if self.0.is_supported(TemporalField::DayOfWeek) {
            return match self.0.get_long(TemporalField::DayOfWeek) {
                day_of_week @ 0..=6 => Some(day_of_week as u8),
                _ => None,
            };
        }
        let days =
            civil::days_from_civil(self.bounded_year()?, self.month()?.into(), self.day()?.into());
        Some(civil::weekday_from_days(days) as u8)
    }

    fn day_of_year(&self) -> Option<u16> {
        if self.0.is_supported(TemporalField::DayOfYear) {
            return match self.0.get_long(TemporalField::DayOfYear) {
                day_of_year @ 1..=366 => Some(day_of_year as u16),
                _ => None,
            };
        }
        let year = self.bounded_year()?;
        Some(civil::day_of_year(year, self.month()?.into(), self.day()?.into()) as u16)
    }

    fn epoch_seconds(&self) -> Option<i64> {
        self.get(TemporalField::InstantSeconds)
    }

    fn epoch_millis(&self) -> Option<i64> {
        let seconds = self.epoch_seconds()?;
        let milli_of_second = i64::from(self.nanoseconds().unwrap_or(0) / 1_000_000);
        seconds.checked_mul(1000)?.checked_add(milli_of_second)
    }

    fn offset_seconds(&self) -> Option<i64> {
        match self.get(TemporalField::OffsetSeconds)? {
            offset if offset.unsigned_abs() < 86_400 => Some(offset),
            _ => None,
        }
    }

    fn zone(&self) -> Option<&str> {
        match self.0.zone_name() {
            Some(zone) if zone.is_ascii() && !zone.is_empty() => Some(zone),
            _ => None,
        }
    }

    fn iso_year_and_week(&self) -> Option<(i64, i64)> {
        Some(iso_week_based_year_and_week(
            self.bounded_year()?,
            self.day_of_week()?.into(),
            self.day_of_year()?.into(),
        ))
    }
}

/// Signed offset decomposition. The hour keeps a signed zero so that
/// `-00:30` and `-00:00` render their sign.
#[derive(Debug)]
struct UtcOffset {
    hour: f64,
    minute: u32,
    second: u32,
}

/// One directive with its options, ready to render.
struct Piece {
    width: Option<usize>,
    padding: Padding,
    flags: Flags,
    colons: u8,
}

impl Piece {
    fn new(options: DirectiveOptions) -> Self {
        Self {
            width: options.width,
            padding: options.padding,
            flags: options.flags,
            colons: options.colons,
        }
    }

    fn format_num_zeros(
        &self,
        f: &mut SizeLimiter<'_>,
        value: impl fmt::Display,
        default_width: usize,
    ) -> Result<(), Error> {
        if self.flags.contains(Flags::LEFT_PADDING) {
            write!(f, "{}", value)
        } else if self.padding == Padding::Spaces {
            let width = self.width.unwrap_or(default_width);
            write!(f, "{: >width$}", value)
        } else {
            let width = self.width.unwrap_or(default_width);
            write!(f, "{:0width$}", value)
        }
    }

    fn format_num_spaces(
        &self,
        f: &mut SizeLimiter<'_>,
        value: impl fmt::Display,
        default_width: usize,
    ) -> Result<(), Error> {
        if self.flags.contains(Flags::LEFT_PADDING) {
            write!(f, "{}", value)
        } else if self.padding == Padding::Zeros {
            let width = self.width.unwrap_or(default_width);
            write!(f, "{:0width$}", value)
        } else {
            let width = self.width.unwrap_or(default_width);
            write!(f, "{: >width$}", value)
        }
    }

    fn format_nanoseconds(
        &self,
        f: &mut SizeLimiter<'_>,
        nanoseconds: u32,
        default_width: usize,
    ) -> Result<(), Error> {
        let width = self.width.unwrap_or(default_width);

        if width <= 9 {
            let value = nanoseconds / 10u32.pow(9 - width as u32);
            write!(f, "{:0n$}", value, n = width)
        } else {
            write!(f, "{:09}{:0n$}", nanoseconds, 0, n = width - 9)
        }
    }

    fn format_string(&self, f: &mut SizeLimiter<'_>, s: impl fmt::Display) -> Result<(), Error> {
        match self.width {
            None => write!(f, "{}", s),
            Some(width) => {
                if self.flags.contains(Flags::LEFT_PADDING) {
                    write!(f, "{}", s)
                } else if self.padding == Padding::Zeros {
                    write!(f, "{:0>width$}", s)
                } else {
                    write!(f, "{: >width$}", s)
                }
            }
        }
    }

    fn compute_offset_parts(&self, offset: i64) -> UtcOffset {
        let offset_abs = offset.unsigned_abs() as u32;

        // UTC is represented as "-00:00" if the '-' flag is set.
        let sign = if offset < 0 || offset == 0 && self.flags.contains(Flags::LEFT_PADDING) {
            -1.0
        } else {
            1.0
        };

        // Convert to f64 to have a signed zero.
        UtcOffset {
            hour: sign * f64::from(offset_abs / 3600),
            minute: (offset_abs / 60) % 60,
            second: offset_abs % 60,
        }
    }

    fn hour_padding(&self, min_width: usize) -> usize {
        const MIN_PADDING: usize = "+hh".len();

        match self.width {
            Some(width) => width.saturating_sub(min_width) + MIN_PADDING,
            None => MIN_PADDING,
        }
    }

    fn write_offset_hh(
        &self,
        f: &mut SizeLimiter<'_>,
        utc_offset: &UtcOffset,
    ) -> Result<(), Error> {
        let n = self.hour_padding("+hh".len());

        match self.padding {
            Padding::Spaces => write!(f, "{: >+n$.0}", utc_offset.hour),
            _ => write!(f, "{:+0n$.0}", utc_offset.hour),
        }
    }

    fn write_offset_hhmm(
        &self,
        f: &mut SizeLimiter<'_>,
        utc_offset: &UtcOffset,
    ) -> Result<(), Error> {
        let n = self.hour_padding("+hhmm".len());

        match self.padding {
            Padding::Spaces => write!(f, "{: >+n$.0}{:02}", utc_offset.hour, utc_offset.minute),
            _ => write!(f, "{:+0n$.0}{:02}", utc_offset.hour, utc_offset.minute),
        }
    }

    fn write_offset_hh_mm(
        &self,
        f: &mut SizeLimiter<'_>,
        utc_offset: &UtcOffset,
    ) -> Result<(), Error> {
        let n = self.hour_padding("+hh:mm".len());

        match self.padding {
            Padding::Spaces => write!(f, "{: >+n$.0}:{:02}", utc_offset.hour, utc_offset.minute),
            _ => write!(f, "{:+0n$.0}:{:02}", utc_offset.hour, utc_offset.minute),
        }
    }

    fn write_offset_hh_mm_ss(
        &self,
        f: &mut SizeLimiter<'_>,
        utc_offset: &UtcOffset,
    ) -> Result<(), Error> {
        let n = self.hour_padding("+hh:mm:ss".len());

        match self.padding {
            Padding::Spaces => write!(
                f,
                "{: >+n$.0}:{:02}:{:02}",
                utc_offset.hour, utc_offset.minute, utc_offset.second
            ),
            _ => write!(
                f,
                "{:+0n$.0}:{:02}:{:02}",
                utc_offset.hour, utc_offset.minute, utc_offset.second
            ),
        }
    }

    /// Minimal `%:::z` form: hours, with minutes and seconds only when
    /// nonzero.
    fn write_offset_minimal(
        &self,
        f: &mut SizeLimiter<'_>,
        utc_offset: &UtcOffset,
    ) -> Result<(), Error> {
        if utc_offset.second == 0 && utc_offset.minute == 0 {
            self.write_offset_hh(f, utc_offset)
        } else if utc_offset.second == 0 {
            self.write_offset_hh_mm(f, utc_offset)
        } else {
            self.write_offset_hh_mm_ss(f, utc_offset)
        }
    }

    fn write_padding(&self, f: &mut SizeLimiter<'_>, min_width: usize) -> Result<(), Error> {
        if let Some(width) = self.width {
            let n = width.saturating_sub(min_width);

            match self.padding {
                Padding::Zeros => write!(f, "{:0>n$}", "")?,
                _ => write!(f, "{: >n$}", "")?,
            };
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn fmt<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        directive: Directive,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        match directive {
            Directive::YearWithCentury => match fields.year() {
                Some(year) => {
                    let default_width = if year < 0 { 5 } else { 4 };
                    self.format_num_zeros(f, year, default_width)
                }
                None => Ok(()),
            },
            Directive::Century => match fields.year() {
                Some(year) => self.format_num_zeros(f, year.div_euclid(100), 2),
                None => Ok(()),
            },
            Directive::YearWithoutCentury => match fields.year() {
                Some(year) => self.format_num_zeros(f, year.rem_euclid(100), 2),
                None => Ok(()),
            },
            Directive::MonthOfYear => match fields.month() {
                Some(month) => self.format_num_zeros(f, month, 2),
                None => Ok(()),
            },
            Directive::MonthOfYearFullName => match fields.month() {
                Some(month) => {
                    let index = usize::from(month - 1);
                    if self.flags.has_change_or_upper_case() {
                        self.format_string(f, MONTHS_UPPER[index])
                    } else {
                        self.format_string(f, MONTHS[index])
                    }
                }
                None => Ok(()),
            },
            Directive::MonthOfYearAbbreviatedName => match fields.month() {
                Some(month) => {
                    let index = usize::from(month - 1);
                    if self.flags.has_change_or_upper_case() {
                        self.format_string(f, &MONTHS_UPPER[index][..3])
                    } else {
                        self.format_string(f, &MONTHS[index][..3])
                    }
                }
                None => Ok(()),
            },
            Directive::DayOfMonthZeroPadded => match fields.day() {
                Some(day) => self.format_num_zeros(f, day, 2),
                None => Ok(()),
            },
            Directive::DayOfMonthBlankPadded => match fields.day() {
                Some(day) => self.format_num_spaces(f, day, 2),
                None => Ok(()),
            },
            Directive::DayOfYear => match fields.day_of_year() {
                Some(day_of_year) => self.format_num_zeros(f, day_of_year, 3),
                None => Ok(()),
            },
            Directive::HourOfDayZeroPadded => match fields.hour() {
                Some(hour) => self.format_num_zeros(f, hour, 2),
                None => Ok(()),
            },
            Directive::HourOfDayBlankPadded => match fields.hour() {
                Some(hour) => self.format_num_spaces(f, hour, 2),
                None => Ok(()),
            },
            Directive::HourOfAmPmZeroPadded => match fields.hour() {
                Some(hour) => self.format_num_zeros(f, hour_of_am_pm(hour), 2),
                None => Ok(()),
            },
            Directive::HourOfAmPmBlankPadded => match fields.hour() {
                Some(hour) => self.format_num_spaces(f, hour_of_am_pm(hour), 2),
                None => Ok(()),
            },
            Directive::AmPmOfDayLower => match fields.hour() {
                Some(hour) => {
                    let (am, pm) = if self.flags.has_change_or_upper_case() {
                        ("AM", "PM")
                    } else {
                        ("am", "pm")
                    };
                    self.format_string(f, if hour < 12 { am } else { pm })
                }
                None => Ok(()),
            },
            Directive::AmPmOfDayUpper => match fields.hour() {
                Some(hour) => {
                    let (am, pm) = if self.flags.contains(Flags::CHANGE_CASE) {
                        ("am", "pm")
                    } else {
                        ("AM", "PM")
                    };
                    self.format_string(f, if hour < 12 { am } else { pm })
                }
                None => Ok(()),
            },
            Directive::MinuteOfHour => match fields.minute() {
                Some(minute) => self.format_num_zeros(f, minute, 2),
                None => Ok(()),
            },
            Directive::SecondOfMinute => match fields.second() {
                Some(second) => self.format_num_zeros(f, second, 2),
                None => Ok(()),
            },
            Directive::MilliOfSecond => match fields.nanoseconds() {
                Some(nanoseconds) => self.format_nanoseconds(f, nanoseconds, 3),
                None => Ok(()),
            },
            Directive::NanoOfSecond => match fields.nanoseconds() {
                Some(nanoseconds) => self.format_nanoseconds(f, nanoseconds, 9),
                None => Ok(()),
            },
            Directive::TimeOffset => match fields.offset_seconds() {
                Some(offset) => {
                    let utc_offset = self.compute_offset_parts(offset);
                    match self.colons {
                        0 => self.write_offset_hhmm(f, &utc_offset),
                        1 => self.write_offset_hh_mm(f, &utc_offset),
                        2 => self.write_offset_hh_mm_ss(f, &utc_offset),
                        _ => self.write_offset_minimal(f, &utc_offset),
                    }
                }
                None => Ok(()),
            },
            Directive::TimeZoneName => {
                if let Some(zone) = fields.zone() {
                    if self.flags.contains(Flags::CHANGE_CASE) {
                        self.format_string(f, Lower::new(zone))
                    } else if self.flags.contains(Flags::UPPER_CASE) {
                        self.format_string(f, Upper::new(zone))
                    } else {
                        self.format_string(f, zone)
                    }
                } else if let Some(offset) = fields.offset_seconds() {
                    let utc_offset = self.compute_offset_parts(offset);
                    self.write_offset_hh_mm(f, &utc_offset)
                } else {
                    Ok(())
                }
            }
            Directive::DayOfWeekFullName => match fields.day_of_week() {
                Some(day_of_week) => {
                    let index = usize::from(day_of_week);
                    if self.flags.has_change_or_upper_case() {
                        self.format_string(f, DAYS_UPPER[index])
                    } else {
                        self.format_string(f, DAYS[index])
                    }
                }
                None => Ok(()),
            },
            Directive::DayOfWeekAbbreviatedName => match fields.day_of_week() {
                Some(day_of_week) => {
                    let index = usize::from(day_of_week);
                    if self.flags.has_change_or_upper_case() {
                        self.format_string(f, &DAYS_UPPER[index][..3])
                    } else {
                        self.format_string(f, &DAYS[index][..3])
                    }
                }
                None => Ok(()),
            },
            Directive::DayOfWeekFromMonday => match fields.day_of_week() {
                Some(day_of_week) => {
                    let day_of_week = if day_of_week == 0 { 7 } else { day_of_week };
                    self.format_num_zeros(f, day_of_week, 1)
                }
                None => Ok(()),
            },
            Directive::DayOfWeekFromSunday => match fields.day_of_week() {
                Some(day_of_week) => self.format_num_zeros(f, day_of_week, 1),
                None => Ok(()),
            },
            Directive::WeekBasedYearWithCentury => match fields.iso_year_and_week() {
                Some((iso_year, _)) => {
                    let default_width = if iso_year < 0 { 5 } else { 4 };
                    self.format_num_zeros(f, iso_year, default_width)
                }
                None => Ok(()),
            },
            Directive::WeekBasedYearWithoutCentury => match fields.iso_year_and_week() {
                Some((iso_year, _)) => self.format_num_zeros(f, iso_year.rem_euclid(100), 2),
                None => Ok(()),
            },
            Directive::WeekOfWeekBasedYear => match fields.iso_year_and_week() {
                Some((_, iso_week)) => self.format_num_zeros(f, iso_week, 2),
                None => Ok(()),
            },
            Directive::WeekOfYearFromSunday | Directive::WeekOfYearFromMonday => {
                let week_start = if directive == Directive::WeekOfYearFromSunday {
                    WeekStart::Sunday
                } else {
                    WeekStart::Monday
                };
                match (fields.day_of_week(), fields.day_of_year()) {
                    (Some(day_of_week), Some(day_of_year)) => {
                        let week =
                            week_number(day_of_week.into(), day_of_year.into(), week_start);
                        self.format_num_zeros(f, week, 2)
                    }
                    _ => Ok(()),
                }
            }
            Directive::SecondsSinceEpoch => match fields.epoch_seconds() {
                Some(seconds) => self.format_num_zeros(f, seconds, 1),
                None => Ok(()),
            },
            Directive::MillisecondsSinceEpoch => match fields.epoch_millis() {
                Some(millis) => self.format_num_zeros(f, millis, 1),
                None => Ok(()),
            },
            Directive::ImmediateNewline => self.format_string(f, "\n"),
            Directive::ImmediateTab => self.format_string(f, "\t"),
            Directive::ImmediatePercent => self.format_string(f, "%"),
            Directive::RecurredDateTime => self.fmt_date_time(f, fields),
            Directive::RecurredDate => self.fmt_date(f, fields),
            Directive::RecurredIsoDate => self.fmt_iso_date(f, fields),
            Directive::RecurredHourMinute => self.fmt_hour_minute(f, fields),
            Directive::RecurredTime12h => self.fmt_time_12h(f, fields),
            Directive::RecurredTime => self.fmt_time(f, fields),
            Directive::RecurredVmsDate => self.fmt_vms_date(f, fields),
            Directive::RecurredDateTimeZone => self.fmt_date_time_zone(f, fields),
        }
    }

    /// `%c`: `"%a %b %e %H:%M:%S %Y"`.
    fn fmt_date_time<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        const MIN_WIDTH_NO_YEAR: usize = "www mmm dd HH:MM:SS ".len();

        let (year, month, day) = match (fields.year(), fields.month(), fields.day()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Ok(()),
        };
        let (hour, minute, second, day_of_week) = match (
            fields.hour(),
            fields.minute(),
            fields.second(),
            fields.day_of_week(),
        ) {
            (Some(hour), Some(minute), Some(second), Some(day_of_week)) => {
                (hour, minute, second, day_of_week)
            }
            _ => return Ok(()),
        };

        let default_year_width = if year < 0 { 5 } else { 4 };
        let min_width = MIN_WIDTH_NO_YEAR + year_width(year).max(default_year_width);
        self.write_padding(f, min_width)?;

        let (day_names, month_names) = if self.flags.contains(Flags::UPPER_CASE) {
            (&DAYS_UPPER, &MONTHS_UPPER)
        } else {
            (&DAYS, &MONTHS)
        };

        let week_day_name = &day_names[usize::from(day_of_week)][..3];
        let month_name = &month_names[usize::from(month - 1)][..3];

        write!(
            f,
            "{} {} {: >2} {:02}:{:02}:{:02} {:0default_year_width$}",
            week_day_name, month_name, day, hour, minute, second, year
        )
    }

    /// `%D`, `%x`: `"%m/%d/%y"`.
    fn fmt_date<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        let (year, month, day) = match (fields.year(), fields.month(), fields.day()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Ok(()),
        };

        self.write_padding(f, "mm/dd/yy".len())?;
        write!(f, "{:02}/{:02}/{:02}", month, day, year.rem_euclid(100))
    }

    /// `%F`: `"%Y-%m-%d"`.
    fn fmt_iso_date<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        const MIN_WIDTH_NO_YEAR: usize = "-mm-dd".len();

        let (year, month, day) = match (fields.year(), fields.month(), fields.day()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Ok(()),
        };

        let default_year_width = if year < 0 { 5 } else { 4 };
        let min_width = MIN_WIDTH_NO_YEAR + year_width(year).max(default_year_width);
        self.write_padding(f, min_width)?;

        write!(f, "{:0default_year_width$}-{:02}-{:02}", year, month, day)
    }

    /// `%R`: `"%H:%M"`.
    fn fmt_hour_minute<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        let (hour, minute) = match (fields.hour(), fields.minute()) {
            (Some(hour), Some(minute)) => (hour, minute),
            _ => return Ok(()),
        };

        self.write_padding(f, "HH:MM".len())?;
        write!(f, "{:02}:{:02}", hour, minute)
    }

    /// `%r`: `"%I:%M:%S %p"`.
    fn fmt_time_12h<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        let (hour, minute, second) = match (fields.hour(), fields.minute(), fields.second()) {
            (Some(hour), Some(minute), Some(second)) => (hour, minute, second),
            _ => return Ok(()),
        };

        self.write_padding(f, "HH:MM:SS PM".len())?;

        let meridian = if hour < 12 { "AM" } else { "PM" };
        write!(
            f,
            "{:02}:{:02}:{:02} {}",
            hour_of_am_pm(hour),
            minute,
            second,
            meridian
        )
    }

    /// `%T`, `%X`: `"%H:%M:%S"`.
    fn fmt_time<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        let (hour, minute, second) = match (fields.hour(), fields.minute(), fields.second()) {
            (Some(hour), Some(minute), Some(second)) => (hour, minute, second),
            _ => return Ok(()),
        };

        self.write_padding(f, "HH:MM:SS".len())?;
        write!(f, "{:02}:{:02}:{:02}", hour, minute, second)
    }

    /// `%v`: `"%e-%b-%Y"`.
    fn fmt_vms_date<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        let (year, month, day) = match (fields.year(), fields.month(), fields.day()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Ok(()),
        };

        self.write_padding(f, "dd-mmm-".len() + year_width(year).max(4))?;

        let month_names = if self.flags.contains(Flags::UPPER_CASE) {
            &MONTHS_UPPER
        } else {
            &MONTHS
        };
        let month_name = &month_names[usize::from(month - 1)][..3];

        write!(f, "{: >2}-{}-{:04}", day, month_name, year)
    }

    /// `%+`: `"%a %b %e %H:%M:%S %Z %Y"`.
    fn fmt_date_time_zone<T: TemporalAccessor + ?Sized>(
        &self,
        f: &mut SizeLimiter<'_>,
        fields: &Fields<'_, T>,
    ) -> Result<(), Error> {
        const MIN_WIDTH_NO_YEAR_ZONE: usize = "www mmm dd HH:MM:SS  ".len();

        let (year, month, day) = match (fields.year(), fields.month(), fields.day()) {
            (Some(year), Some(month), Some(day)) => (year, month, day),
            _ => return Ok(()),
        };
        let (hour, minute, second, day_of_week) = match (
            fields.hour(),
            fields.minute(),
            fields.second(),
            fields.day_of_week(),
        ) {
            (Some(hour), Some(minute), Some(second), Some(day_of_week)) => {
                (hour, minute, second, day_of_week)
            }
            _ => return Ok(()),
        };

        let default_year_width = if year < 0 { 5 } else { 4 };

        let (day_names, month_names) = if self.flags.contains(Flags::UPPER_CASE) {
            (&DAYS_UPPER, &MONTHS_UPPER)
        } else {
            (&DAYS, &MONTHS)
        };

        let week_day_name = &day_names[usize::from(day_of_week)][..3];
        let month_name = &month_names[usize::from(month - 1)][..3];

        // The zone renders like a bare `%Z`: name first, offset fallback.
        let mut zone_buf = [0u8; 16];
        let zone = match fields.zone() {
            Some(zone) => zone,
            None => match fields.offset_seconds() {
                Some(offset) => {
                    let utc_offset = self.compute_offset_parts(offset);
                    render_offset_hh_mm(&mut zone_buf, &utc_offset)
                }
                None => "",
            },
        };

        let min_width =
            MIN_WIDTH_NO_YEAR_ZONE + zone.len() + year_width(year).max(default_year_width);
        self.write_padding(f, min_width)?;

        write!(
            f,
            "{} {} {: >2} {:02}:{:02}:{:02} {} {:0default_year_width$}",
            week_day_name, month_name, day, hour, minute, second, zone, year
        )
    }
}

/// Render `±HH:MM` into a stack buffer for the `%+` zone fallback.
fn render_offset_hh_mm<'a>(buf: &'a mut [u8; 16], utc_offset: &UtcOffset) -> &'a str {
    use core::fmt::Write as _;

    struct SliceWriter<'b> {
        buf: &'b mut [u8],
        len: usize,
    }

    impl fmt::Write for SliceWriter<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            if self.len + bytes.len() > self.buf.len() {
                return Err(fmt::Error);
            }
            self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            self.len += bytes.len();
            Ok(())
        }
    }

    let mut writer = SliceWriter { buf, len: 0 };
    // The offset magnitude is below one day, so this always fits.
    let _ = write!(writer, "{:+03.0}:{:02}", utc_offset.hour, utc_offset.minute);
    let len = writer.len;
    core::str::from_utf8(&buf[..len]).expect("offset rendering is ASCII")
}

fn hour_of_am_pm(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        hour => hour,
    }
}

fn year_width(year: i64) -> usize {
    let mut n = if year <= 0 { 1 } else { 0 };
    let mut val = year;
    while val != 0 {
        val /= 10;
        n += 1;
    }
    n
}

/// Formatting engine over a compiled format and a temporal accessor.
pub(crate) struct TimeFormatter<'t, 'f, T: ?Sized> {
    time: &'t T,
    format: &'f Format,
}

impl<'t, 'f, T: TemporalAccessor + ?Sized> TimeFormatter<'t, 'f, T> {
    pub(crate) fn new(time: &'t T, format: &'f Format) -> Self {
        Self { time, format }
    }

    pub(crate) fn fmt(&self, buf: &mut dyn Write) -> Result<(), Error> {
        // Bound the output size by the source pattern length.
        let size_limit = self
            .format
            .source_len()
            .saturating_mul(512 * 1024)
            .max(1024);
        let mut f = SizeLimiter::new(buf, size_limit);

        let fields = Fields(self.time);

        for token in self.format.tokens() {
            match token {
                FormatToken::Immediate(text) => f.write_all(text.as_bytes())?,
                FormatToken::Directive {
                    directive, options, ..
                } => Piece::new(*options).fmt(&mut f, *directive, &fields)?,
            }
        }

        Ok(())
    }
}
