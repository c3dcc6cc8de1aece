//! The `Parsed` accumulator filled by the parsing engine, and the typed
//! queries projecting it into element maps.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Epoch directive value: the later of `%s`/`%Q` wins.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Epoch {
    /// Seconds since 1970-01-01T00:00:00Z, from `%s`.
    Seconds(i64),
    /// Milliseconds since 1970-01-01T00:00:00Z, from `%Q`.
    Millis(i64),
}

/// Meridian indicator parsed from `%p`/`%P`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Meridian {
    /// Ante meridiem.
    Am,
    /// Post meridiem.
    Pm,
}

/// Accumulator of parsed fields, one instance per parse.
///
/// Slots are last-wins, matching the reference runtime's hash-assignment
/// semantics. Calendar values outside their natural ranges (month 13,
/// day 32) are stored as parsed; [`Parsed::resolve`] rejects them.
///
/// [`Parsed::resolve`]: Parsed::resolve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub(crate) year: Option<i64>,
    pub(crate) century: Option<i64>,
    pub(crate) year_of_century: Option<i64>,
    pub(crate) month: Option<u32>,
    pub(crate) day_of_month: Option<u32>,
    pub(crate) day_of_year: Option<u32>,
    pub(crate) hour: Option<u32>,
    pub(crate) minute: Option<u32>,
    pub(crate) second: Option<u32>,
    pub(crate) milli_of_second: Option<u32>,
    pub(crate) nano_of_second: Option<u32>,
    pub(crate) epoch: Option<Epoch>,
    pub(crate) am_pm: Option<Meridian>,
    pub(crate) day_of_week: Option<u32>,
    pub(crate) week_based_year: Option<i64>,
    pub(crate) week_based_year_of_century: Option<i64>,
    pub(crate) week_of_week_based_year: Option<u32>,
    pub(crate) week_of_year_sunday: Option<u32>,
    pub(crate) week_of_year_monday: Option<u32>,
    pub(crate) zone: Option<String>,
    pub(crate) offset_seconds: Option<i32>,
    pub(crate) leftover: Option<String>,
    pub(crate) original: String,
}

impl Parsed {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Year with century, from `%Y`.
    pub fn year(&self) -> Option<i64> {
        self.year
    }

    /// Century, from `%C`.
    pub fn century(&self) -> Option<i64> {
        self.century
    }

    /// Year within the century in `0..=99`, from `%y`.
    pub fn year_of_century(&self) -> Option<i64> {
        self.year_of_century
    }

    /// Month of the year, from `%m`/`%B`/`%b`.
    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// Day of the month, from `%d`/`%e`.
    pub fn day_of_month(&self) -> Option<u32> {
        self.day_of_month
    }

    /// Day of the year, from `%j`.
    pub fn day_of_year(&self) -> Option<u32> {
        self.day_of_year
    }

    /// Hour as written, without the meridian applied.
    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    /// Minute of the hour.
    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    /// Second of the minute; `60` is the leap-second sentinel.
    pub fn second(&self) -> Option<u32> {
        self.second
    }

    /// Millisecond fraction, from `%L`.
    pub fn milli_of_second(&self) -> Option<u32> {
        self.milli_of_second
    }

    /// Nanosecond fraction, from `%N`.
    pub fn nano_of_second(&self) -> Option<u32> {
        self.nano_of_second
    }

    /// Epoch slot, from `%s`/`%Q`; the later directive wins.
    pub fn epoch(&self) -> Option<Epoch> {
        self.epoch
    }

    /// Meridian indicator, from `%p`/`%P`.
    pub fn am_pm(&self) -> Option<Meridian> {
        self.am_pm
    }

    /// Day of the week in `0..=6` with `Sunday == 0`, from `%A`/`%a`/`%u`/`%w`.
    pub fn day_of_week(&self) -> Option<u32> {
        self.day_of_week
    }

    /// ISO 8601 week-based year, from `%G`.
    pub fn week_based_year(&self) -> Option<i64> {
        self.week_based_year
    }

    /// ISO 8601 week-based year within the century, from `%g`.
    pub fn week_based_year_of_century(&self) -> Option<i64> {
        self.week_based_year_of_century
    }

    /// ISO 8601 week number, from `%V`.
    pub fn week_of_week_based_year(&self) -> Option<u32> {
        self.week_of_week_based_year
    }

    /// Week of the year counted from the first Sunday, from `%U`.
    pub fn week_of_year_sunday(&self) -> Option<u32> {
        self.week_of_year_sunday
    }

    /// Week of the year counted from the first Monday, from `%W`.
    pub fn week_of_year_monday(&self) -> Option<u32> {
        self.week_of_year_monday
    }

    /// Original text matched by `%Z`/`%z`.
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Zone offset in seconds, when the matched zone resolved.
    pub fn offset_seconds(&self) -> Option<i32> {
        self.offset_seconds
    }

    /// Input text remaining after the format was matched.
    pub fn leftover(&self) -> Option<&str> {
        self.leftover.as_deref()
    }

    /// The full original input.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Run a typed query against the parsed fields.
    pub fn query<Q: ParsedQuery>(&self) -> Q::Output {
        Q::query(self)
    }

    /// Year with the century rules applied: `%Y` as written, else `%y`
    /// placed in the `%C` century or pivoted on 69 into 1969..=2068.
    pub(crate) fn effective_year(&self) -> Option<i64> {
        match (self.year, self.year_of_century) {
            (Some(year), _) => Some(year),
            (None, Some(two_digit)) => Some(expand_two_digit_year(two_digit, self.century)),
            (None, None) => None,
        }
    }

    /// Week-based year with the same century rules as
    /// [`Parsed::effective_year`].
    pub(crate) fn effective_week_based_year(&self) -> Option<i64> {
        match (self.week_based_year, self.week_based_year_of_century) {
            (Some(year), _) => Some(year),
            (None, Some(two_digit)) => Some(expand_two_digit_year(two_digit, self.century)),
            (None, None) => None,
        }
    }

    /// Hour with the meridian applied.
    pub(crate) fn effective_hour(&self) -> Option<u32> {
        let hour = self.hour?;
        Some(match self.am_pm {
            Some(Meridian::Am) => hour % 12,
            Some(Meridian::Pm) => hour % 12 + 12,
            None => hour,
        })
    }

    /// Sub-second fraction in nanoseconds, from `%N` or `%L`.
    pub(crate) fn fraction_nanos(&self) -> u32 {
        self.nano_of_second
            .or(self.milli_of_second.map(|milli| milli * 1_000_000))
            .unwrap_or(0)
    }

    fn has_fraction(&self) -> bool {
        self.nano_of_second.is_some() || self.milli_of_second.is_some()
    }
}

/// Apply the reference pivot: `69..=99` land in the 1900s, `0..=68` in the
/// 2000s, unless an explicit century was parsed.
fn expand_two_digit_year(two_digit: i64, century: Option<i64>) -> i64 {
    match century {
        Some(century) => century * 100 + two_digit.rem_euclid(100),
        None if two_digit >= 69 => two_digit + 1900,
        None => two_digit + 2000,
    }
}

/// A typed query over a [`Parsed`] record.
pub trait ParsedQuery {
    /// Result of the query.
    type Output;

    /// Project the parsed fields.
    fn query(parsed: &Parsed) -> Self::Output;
}

/// Plain decimal value: `unscaled · 10⁻ˢᶜᵃˡᵉ`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Decimal {
    /// Unscaled integer value.
    pub unscaled: i64,
    /// Number of decimal fraction digits.
    pub scale: u32,
}

impl Decimal {
    fn normalized(mut unscaled: i64, mut scale: u32) -> Self {
        while scale > 0 && unscaled % 10 == 0 {
            unscaled /= 10;
            scale -= 1;
        }
        Self { unscaled, scale }
    }
}

/// Reduced fraction `numerator / denominator`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Rational {
    /// Numerator, carrying the sign.
    pub numerator: i64,
    /// Positive denominator.
    pub denominator: i64,
}

impl Rational {
    fn reduced(numerator: i64, denominator: i64) -> Self {
        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()).max(1) as i64;
        Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let rem = a % b;
        a = b;
        b = rem;
    }
    a
}

/// One value of an elements map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Whole-number element.
    Integer(i64),
    /// Fractional element in decimal form.
    Decimal(Decimal),
    /// Fractional element in rational form.
    Rational(Rational),
    /// Textual element.
    Text(String),
}

/// Elements map keyed like the reference runtime's parse result, with
/// fractional values as [`Decimal`].
#[derive(Debug, Copy, Clone)]
pub struct ElementsWithFractionInDecimal;

impl ParsedQuery for ElementsWithFractionInDecimal {
    type Output = BTreeMap<&'static str, Element>;

    fn query(parsed: &Parsed) -> Self::Output {
        elements(parsed, FractionFlavor::Decimal)
    }
}

/// Elements map keyed like the reference runtime's parse result, with
/// fractional values as [`Rational`].
#[derive(Debug, Copy, Clone)]
pub struct ElementsWithFractionInRational;

impl ParsedQuery for ElementsWithFractionInRational {
    type Output = BTreeMap<&'static str, Element>;

    fn query(parsed: &Parsed) -> Self::Output {
        elements(parsed, FractionFlavor::Rational)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FractionFlavor {
    Decimal,
    Rational,
}

impl FractionFlavor {
    fn fraction(self, unscaled: i64, scale: u32) -> Element {
        match self {
            FractionFlavor::Decimal => Element::Decimal(Decimal::normalized(unscaled, scale)),
            FractionFlavor::Rational => {
                Element::Rational(Rational::reduced(unscaled, 10i64.pow(scale)))
            }
        }
    }
}

fn elements(parsed: &Parsed, flavor: FractionFlavor) -> BTreeMap<&'static str, Element> {
    let mut map = BTreeMap::new();

    if let Some(year) = parsed.effective_year() {
        map.insert("year", Element::Integer(year));
    }
    if let Some(month) = parsed.month {
        map.insert("mon", Element::Integer(month.into()));
    }
    if let Some(day) = parsed.day_of_month {
        map.insert("mday", Element::Integer(day.into()));
    }
    if let Some(day_of_year) = parsed.day_of_year {
        map.insert("yday", Element::Integer(day_of_year.into()));
    }
    if let Some(hour) = parsed.effective_hour() {
        map.insert("hour", Element::Integer(hour.into()));
    }
    if let Some(minute) = parsed.minute {
        map.insert("min", Element::Integer(minute.into()));
    }
    if let Some(second) = parsed.second {
        map.insert("sec", Element::Integer(second.into()));
    }
    if parsed.has_fraction() {
        map.insert(
            "sec_fraction",
            flavor.fraction(parsed.fraction_nanos().into(), 9),
        );
    }
    match parsed.epoch {
        Some(Epoch::Seconds(seconds)) => {
            map.insert("seconds", Element::Integer(seconds));
        }
        Some(Epoch::Millis(millis)) => {
            map.insert("seconds", flavor.fraction(millis, 3));
        }
        None => {}
    }
    if let Some(zone) = &parsed.zone {
        map.insert("zone", Element::Text(zone.clone()));
    }
    if let Some(offset) = parsed.offset_seconds {
        map.insert("offset", Element::Integer(offset.into()));
    }
    if let Some(day_of_week) = parsed.day_of_week {
        map.insert("wday", Element::Integer(day_of_week.into()));
    }
    if let Some(week_based_year) = parsed.effective_week_based_year() {
        map.insert("cwyear", Element::Integer(week_based_year));
    }
    if let Some(week) = parsed.week_of_week_based_year {
        map.insert("cweek", Element::Integer(week.into()));
    }
    if let Some(week) = parsed.week_of_year_sunday {
        map.insert("wnum0", Element::Integer(week.into()));
    }
    if let Some(week) = parsed.week_of_year_monday {
        map.insert("wnum1", Element::Integer(week.into()));
    }
    if let Some(leftover) = &parsed.leftover {
        map.insert("leftover", Element::Text(leftover.clone()));
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_two_digit_year(69, None), 1969);
        assert_eq!(expand_two_digit_year(99, None), 1999);
        assert_eq!(expand_two_digit_year(0, None), 2000);
        assert_eq!(expand_two_digit_year(68, None), 2068);
        assert_eq!(expand_two_digit_year(5, Some(18)), 1805);
    }

    #[test]
    fn test_decimal_normalization() {
        assert_eq!(
            Decimal::normalized(500_000_000, 9),
            Decimal {
                unscaled: 5,
                scale: 1
            }
        );
        assert_eq!(
            Decimal::normalized(123_000_000, 9),
            Decimal {
                unscaled: 123,
                scale: 3
            }
        );
        assert_eq!(Decimal::normalized(0, 9), Decimal { unscaled: 0, scale: 0 });
    }

    #[test]
    fn test_rational_reduction() {
        assert_eq!(
            Rational::reduced(500_000_000, 1_000_000_000),
            Rational {
                numerator: 1,
                denominator: 2
            }
        );
        assert_eq!(
            Rational::reduced(12_849_124, 1000),
            Rational {
                numerator: 3_212_281,
                denominator: 250
            }
        );
    }
}
