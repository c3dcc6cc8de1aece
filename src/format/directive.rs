//! Directive registry: the mapping between specifier letters and symbolic
//! directive kinds, with the metadata both engines consult.

use crate::assert::{assert_sorted, assert_sorted_keys};

/// Symbolic kind of a single `%` directive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Directive {
    /// `%Y`
    YearWithCentury,
    /// `%C`
    Century,
    /// `%y`
    YearWithoutCentury,
    /// `%m`
    MonthOfYear,
    /// `%B`
    MonthOfYearFullName,
    /// `%b`, `%h`
    MonthOfYearAbbreviatedName,
    /// `%d`
    DayOfMonthZeroPadded,
    /// `%e`
    DayOfMonthBlankPadded,
    /// `%j`
    DayOfYear,
    /// `%H`
    HourOfDayZeroPadded,
    /// `%k`
    HourOfDayBlankPadded,
    /// `%I`
    HourOfAmPmZeroPadded,
    /// `%l`
    HourOfAmPmBlankPadded,
    /// `%p`
    AmPmOfDayUpper,
    /// `%P`
    AmPmOfDayLower,
    /// `%M`
    MinuteOfHour,
    /// `%S`
    SecondOfMinute,
    /// `%L`
    MilliOfSecond,
    /// `%N`
    NanoOfSecond,
    /// `%z`, `%:z`, `%::z`, `%:::z`
    TimeOffset,
    /// `%Z`
    TimeZoneName,
    /// `%A`
    DayOfWeekFullName,
    /// `%a`
    DayOfWeekAbbreviatedName,
    /// `%u`
    DayOfWeekFromMonday,
    /// `%w`
    DayOfWeekFromSunday,
    /// `%G`
    WeekBasedYearWithCentury,
    /// `%g`
    WeekBasedYearWithoutCentury,
    /// `%V`
    WeekOfWeekBasedYear,
    /// `%U`
    WeekOfYearFromSunday,
    /// `%W`
    WeekOfYearFromMonday,
    /// `%s`
    SecondsSinceEpoch,
    /// `%Q`
    MillisecondsSinceEpoch,
    /// `%n`
    ImmediateNewline,
    /// `%t`
    ImmediateTab,
    /// `%%`
    ImmediatePercent,
    /// `%c` --> `"%a %b %e %H:%M:%S %Y"`
    RecurredDateTime,
    /// `%D`, `%x` --> `"%m/%d/%y"`
    RecurredDate,
    /// `%F` --> `"%Y-%m-%d"`
    RecurredIsoDate,
    /// `%R` --> `"%H:%M"`
    RecurredHourMinute,
    /// `%r` --> `"%I:%M:%S %p"`
    RecurredTime12h,
    /// `%T`, `%X` --> `"%H:%M:%S"`
    RecurredTime,
    /// `%v` --> `"%e-%b-%Y"`
    RecurredVmsDate,
    /// `%+` --> `"%a %b %e %H:%M:%S %Z %Y"`
    RecurredDateTimeZone,
}

/// How the parsing engine consumes input for a directive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum FieldKind {
    /// Fixed-width numeric field, reading up to `max_digits` digits.
    Numeric { max_digits: usize },
    /// `%Y`/`%G`: optional sign, then four digits when followed by a number
    /// pattern, else a greedy digit run.
    SignedYear,
    /// `%s`/`%Q`: signed epoch digit run.
    Epoch { millis: bool },
    /// `%N`/`%L`: fractional seconds kept to `digits` significant digits.
    Fraction { digits: u32 },
    /// Month or weekday name.
    Text,
    /// `%p`/`%P` meridian indicator.
    Meridian,
    /// `%z`/`%Z`: zone abbreviation or numeric offset.
    Zone,
    /// Matches like the contained literal text.
    Literal(&'static str),
    /// Expands to a fixed sub-pattern before evaluation.
    Recurred(&'static str),
}

/// Sorted table of specifier letters.
const SPECIFIERS: &[(u8, Directive)] = assert_sorted_keys(&[
    (b'%', Directive::ImmediatePercent),
    (b'+', Directive::RecurredDateTimeZone),
    (b'A', Directive::DayOfWeekFullName),
    (b'B', Directive::MonthOfYearFullName),
    (b'C', Directive::Century),
    (b'D', Directive::RecurredDate),
    (b'F', Directive::RecurredIsoDate),
    (b'G', Directive::WeekBasedYearWithCentury),
    (b'H', Directive::HourOfDayZeroPadded),
    (b'I', Directive::HourOfAmPmZeroPadded),
    (b'L', Directive::MilliOfSecond),
    (b'M', Directive::MinuteOfHour),
    (b'N', Directive::NanoOfSecond),
    (b'P', Directive::AmPmOfDayLower),
    (b'Q', Directive::MillisecondsSinceEpoch),
    (b'R', Directive::RecurredHourMinute),
    (b'S', Directive::SecondOfMinute),
    (b'T', Directive::RecurredTime),
    (b'U', Directive::WeekOfYearFromSunday),
    (b'V', Directive::WeekOfWeekBasedYear),
    (b'W', Directive::WeekOfYearFromMonday),
    (b'X', Directive::RecurredTime),
    (b'Y', Directive::YearWithCentury),
    (b'Z', Directive::TimeZoneName),
    (b'a', Directive::DayOfWeekAbbreviatedName),
    (b'b', Directive::MonthOfYearAbbreviatedName),
    (b'c', Directive::RecurredDateTime),
    (b'd', Directive::DayOfMonthZeroPadded),
    (b'e', Directive::DayOfMonthBlankPadded),
    (b'g', Directive::WeekBasedYearWithoutCentury),
    (b'h', Directive::MonthOfYearAbbreviatedName),
    (b'j', Directive::DayOfYear),
    (b'k', Directive::HourOfDayBlankPadded),
    (b'l', Directive::HourOfAmPmBlankPadded),
    (b'm', Directive::MonthOfYear),
    (b'n', Directive::ImmediateNewline),
    (b'p', Directive::AmPmOfDayUpper),
    (b'r', Directive::RecurredTime12h),
    (b's', Directive::SecondsSinceEpoch),
    (b't', Directive::ImmediateTab),
    (b'u', Directive::DayOfWeekFromMonday),
    (b'v', Directive::RecurredVmsDate),
    (b'w', Directive::DayOfWeekFromSunday),
    (b'x', Directive::RecurredDate),
    (b'y', Directive::YearWithoutCentury),
    (b'z', Directive::TimeOffset),
]);

/// Specifiers accepting the `E` POSIX locale modifier.
pub(crate) const E_MODIFIER_SPECS: &[u8] = assert_sorted(b"CXYcxy");

/// Specifiers accepting the `O` POSIX locale modifier.
pub(crate) const O_MODIFIER_SPECS: &[u8] = assert_sorted(b"HIMSUVWdeklmuwy");

impl Directive {
    /// Look up the directive for a specifier letter.
    pub(crate) fn lookup(specifier: u8) -> Option<Directive> {
        match SPECIFIERS.binary_search_by_key(&specifier, |&(c, _)| c) {
            Ok(index) => Some(SPECIFIERS[index].1),
            Err(_) => None,
        }
    }

    /// How the parsing engine consumes input for this directive.
    pub(crate) fn field_kind(self) -> FieldKind {
        match self {
            Directive::YearWithCentury | Directive::WeekBasedYearWithCentury => {
                FieldKind::SignedYear
            }
            Directive::Century
            | Directive::YearWithoutCentury
            | Directive::MonthOfYear
            | Directive::DayOfMonthZeroPadded
            | Directive::DayOfMonthBlankPadded
            | Directive::HourOfDayZeroPadded
            | Directive::HourOfDayBlankPadded
            | Directive::HourOfAmPmZeroPadded
            | Directive::HourOfAmPmBlankPadded
            | Directive::MinuteOfHour
            | Directive::SecondOfMinute
            | Directive::WeekBasedYearWithoutCentury
            | Directive::WeekOfWeekBasedYear
            | Directive::WeekOfYearFromSunday
            | Directive::WeekOfYearFromMonday => FieldKind::Numeric { max_digits: 2 },
            Directive::DayOfYear => FieldKind::Numeric { max_digits: 3 },
            Directive::DayOfWeekFromMonday | Directive::DayOfWeekFromSunday => {
                FieldKind::Numeric { max_digits: 1 }
            }
            Directive::SecondsSinceEpoch => FieldKind::Epoch { millis: false },
            Directive::MillisecondsSinceEpoch => FieldKind::Epoch { millis: true },
            Directive::NanoOfSecond => FieldKind::Fraction { digits: 9 },
            Directive::MilliOfSecond => FieldKind::Fraction { digits: 3 },
            Directive::MonthOfYearFullName
            | Directive::MonthOfYearAbbreviatedName
            | Directive::DayOfWeekFullName
            | Directive::DayOfWeekAbbreviatedName => FieldKind::Text,
            Directive::AmPmOfDayUpper | Directive::AmPmOfDayLower => FieldKind::Meridian,
            Directive::TimeOffset | Directive::TimeZoneName => FieldKind::Zone,
            Directive::ImmediateNewline => FieldKind::Literal("\n"),
            Directive::ImmediateTab => FieldKind::Literal("\t"),
            Directive::ImmediatePercent => FieldKind::Literal("%"),
            Directive::RecurredDateTime => FieldKind::Recurred("%a %b %e %H:%M:%S %Y"),
            Directive::RecurredDate => FieldKind::Recurred("%m/%d/%y"),
            Directive::RecurredIsoDate => FieldKind::Recurred("%Y-%m-%d"),
            Directive::RecurredHourMinute => FieldKind::Recurred("%H:%M"),
            Directive::RecurredTime12h => FieldKind::Recurred("%I:%M:%S %p"),
            Directive::RecurredTime => FieldKind::Recurred("%H:%M:%S"),
            Directive::RecurredVmsDate => FieldKind::Recurred("%e-%b-%Y"),
            Directive::RecurredDateTimeZone => FieldKind::Recurred("%a %b %e %H:%M:%S %Z %Y"),
        }
    }

    /// Whether input matched by this directive begins with a digit, for the
    /// lookahead that bounds `%Y`/`%G` digit runs.
    pub(crate) fn starts_numeric(self) -> bool {
        match self.field_kind() {
            FieldKind::Numeric { .. }
            | FieldKind::SignedYear
            | FieldKind::Epoch { .. }
            | FieldKind::Fraction { .. } => true,
            FieldKind::Recurred(expansion) => {
                // All expansions start with a directive token.
                let specifier = expansion.as_bytes()[1];
                match Directive::lookup(specifier) {
                    Some(directive) => directive.starts_numeric(),
                    None => false,
                }
            }
            _ => false,
        }
    }
}
