//! Time-zone abbreviation table and offset resolution.
//!
//! Maps strings such as `"PDT"`, `"GMT+09:30"`, `"UTC+19.5"`,
//! `"Cen. Australia Standard Time"`, or `"-0430"` to a signed offset in
//! seconds, reproducing the reference runtime's zone table and its
//! `date_zone_to_diff` routine.

use crate::assert::assert_sorted_names;
use crate::utils::Cursor;

/// Offsets strictly beyond one day are unresolvable.
const MAX_OFFSET: i64 = 86_400;

/// Zone-name normalization buffer. The longest table key plus a daylight
/// suffix fits well within it; longer names cannot resolve.
const NAME_CAP: usize = 64;

/// Why a string failed to resolve to an offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ZoneDiffError {
    /// The string is not a zone name or numeric offset.
    NotAZone,
    /// A fractional-hour offset finer than the supported precision.
    FractionTooPrecise,
}

/// The reference runtime's zone table: normalized abbreviation to offset in
/// seconds. Sorted for binary search; keys are uppercase with single spaces.
#[rustfmt::skip]
const ZONETAB: &[(&str, i32)] = assert_sorted_names(&[
    ("A", 3600),
    ("ADT", -10_800),
    ("AFGHANISTAN", 16_200),
    ("AHST", -36_000),
    ("AKDT", -28_800),
    ("AKST", -32_400),
    ("ALASKAN", -32_400),
    ("ARAB", 10_800),
    ("ARABIAN", 14_400),
    ("ARABIC", 10_800),
    ("ART", -10_800),
    ("AST", -14_400),
    ("AT", -7200),
    ("ATLANTIC", -14_400),
    ("AUS CENTRAL", 34_200),
    ("AUS EASTERN", 36_000),
    ("AZORES", -3600),
    ("B", 7200),
    ("BRST", -7200),
    ("BRT", -10_800),
    ("BST", 3600),
    ("BT", 10_800),
    ("C", 10_800),
    ("CANADA CENTRAL", -21_600),
    ("CAPE VERDE", -3600),
    ("CAT", -36_000),
    ("CAUCASUS", 14_400),
    ("CCT", 28_800),
    ("CDT", -18_000),
    ("CEN. AUSTRALIA", 34_200),
    ("CENTRAL", -21_600),
    ("CENTRAL AMERICA", -21_600),
    ("CENTRAL ASIA", 21_600),
    ("CENTRAL EUROPE", 3600),
    ("CENTRAL EUROPEAN", 3600),
    ("CENTRAL PACIFIC", 39_600),
    ("CEST", 7200),
    ("CET", 3600),
    ("CHINA", 28_800),
    ("CLST", -10_800),
    ("CLT", -14_400),
    ("CST", -21_600),
    ("D", 14_400),
    ("DATELINE", -43_200),
    ("E", 18_000),
    ("E. AFRICA", 10_800),
    ("E. AUSTRALIA", 36_000),
    ("E. EUROPE", 7200),
    ("E. SOUTH AMERICA", -10_800),
    ("EADT", 39_600),
    ("EAST", 36_000),
    ("EASTERN", -18_000),
    ("EAT", 10_800),
    ("EDT", -14_400),
    ("EEST", 10_800),
    ("EET", 7200),
    ("EGYPT", 7200),
    ("EKATERINBURG", 18_000),
    ("EST", -18_000),
    ("F", 21_600),
    ("FIJI", 43_200),
    ("FLE", 7200),
    ("FST", 7200),
    ("FWT", 3600),
    ("G", 25_200),
    ("GMT", 0),
    ("GREENLAND", -10_800),
    ("GREENWICH", 0),
    ("GST", 36_000),
    ("GTB", 7200),
    ("H", 28_800),
    ("HADT", -32_400),
    ("HAST", -36_000),
    ("HAWAIIAN", -36_000),
    ("HDT", -32_400),
    ("HST", -36_000),
    ("I", 32_400),
    ("IDLE", 43_200),
    ("IDLW", -43_200),
    ("INDIA", 19_800),
    ("IRAN", 12_600),
    ("IST", 19_800),
    ("JERUSALEM", 7200),
    ("JST", 32_400),
    ("K", 36_000),
    ("KOREA", 32_400),
    ("KST", 32_400),
    ("L", 39_600),
    ("M", 43_200),
    ("MALAY PENINSULA", 28_800),
    ("MDT", -21_600),
    ("MEST", 7200),
    ("MESZ", 7200),
    ("MET", 3600),
    ("MEWT", 3600),
    ("MEXICO", -21_600),
    ("MEZ", 3600),
    ("MID-ATLANTIC", -7200),
    ("MOUNTAIN", -25_200),
    ("MSD", 14_400),
    ("MSK", 10_800),
    ("MST", -25_200),
    ("MYANMAR", 23_400),
    ("N", -3600),
    ("N. CENTRAL ASIA", 21_600),
    ("NDT", -9000),
    ("NEPAL", 20_700),
    ("NEW ZEALAND", 43_200),
    ("NEWFOUNDLAND", -12_600),
    ("NORTH ASIA", 25_200),
    ("NORTH ASIA EAST", 28_800),
    ("NST", -12_600),
    ("NT", -39_600),
    ("NZDT", 46_800),
    ("NZST", 43_200),
    ("NZT", 43_200),
    ("O", -7200),
    ("P", -10_800),
    ("PACIFIC", -28_800),
    ("PACIFIC SA", -14_400),
    ("PDT", -25_200),
    ("PST", -28_800),
    ("Q", -14_400),
    ("R", -18_000),
    ("ROMANCE", 3600),
    ("RUSSIAN", 10_800),
    ("S", -21_600),
    ("SA EASTERN", -10_800),
    ("SA PACIFIC", -18_000),
    ("SA WESTERN", -14_400),
    ("SAMOA", -39_600),
    ("SAST", 7200),
    ("SE ASIA", 25_200),
    ("SGT", 28_800),
    ("SOUTH AFRICA", 7200),
    ("SRI LANKA", 21_600),
    ("SST", 7200),
    ("SWT", 3600),
    ("T", -25_200),
    ("TAIPEI", 28_800),
    ("TASMANIA", 36_000),
    ("TOKYO", 32_400),
    ("TONGA", 46_800),
    ("U", -28_800),
    ("US EASTERN", -18_000),
    ("US MOUNTAIN", -25_200),
    ("UT", 0),
    ("UTC", 0),
    ("V", -32_400),
    ("VLADIVOSTOK", 36_000),
    ("W", -36_000),
    ("W. AUSTRALIA", 28_800),
    ("W. CENTRAL AFRICA", 3600),
    ("W. EUROPE", 3600),
    ("WADT", 28_800),
    ("WAST", 25_200),
    ("WAT", 3600),
    ("WEST", 3600),
    ("WEST ASIA", 18_000),
    ("WEST PACIFIC", 36_000),
    ("WET", 0),
    ("X", -39_600),
    ("Y", -43_200),
    ("YAKUTSK", 32_400),
    ("YDT", -28_800),
    ("YST", -32_400),
    ("Z", 0),
    ("ZP4", 14_400),
    ("ZP5", 18_000),
    ("ZP6", 21_600),
]);

/// Resolve a zone abbreviation or numeric offset to seconds.
///
/// Returns `None` for anything the reference runtime cannot resolve,
/// including fractional-hour offsets finer than the supported precision.
///
/// # Examples
///
/// ```
/// assert_eq!(rubytime::resolve_offset("PDT"), Some(-25200));
/// assert_eq!(rubytime::resolve_offset("GMT+09:30"), Some(34200));
/// assert_eq!(rubytime::resolve_offset("Cen. Australia Standard Time"), Some(34200));
/// assert_eq!(rubytime::resolve_offset("-0430"), Some(-16200));
/// assert_eq!(rubytime::resolve_offset("Middle Earth"), None);
/// ```
pub fn resolve_offset(name_or_numeric: &str) -> Option<i32> {
    zone_to_offset(name_or_numeric).ok()
}

/// Three-state offset resolution: seconds, malformed fraction, or not a
/// zone. The parsing engine needs the distinction; `resolve_offset` is the
/// two-state public projection.
pub(crate) fn zone_to_offset(text: &str) -> Result<i32, ZoneDiffError> {
    let mut buf = [0u8; NAME_CAP];
    let normalized = normalize(text, &mut buf).ok_or(ZoneDiffError::NotAZone)?;

    let mut cursor = Cursor::new(normalized.as_bytes());
    let had_prefix = cursor.read_optional_tag(b"GMT")
        || cursor.read_optional_tag(b"UTC")
        || cursor.read_optional_tag(b"UT");

    let sign = match cursor.peek() {
        Some(b'+') => {
            cursor.next();
            Some(1)
        }
        Some(b'-') => {
            cursor.next();
            Some(-1)
        }
        _ => None,
    };

    match sign {
        Some(sign) => numeric_offset(&mut cursor, sign),
        // A bare digit run is taken as an unsigned offset, but only when it
        // cannot be a table key (no key starts with a digit).
        None if !had_prefix && matches!(cursor.peek(), Some(b'0'..=b'9')) => {
            numeric_offset(&mut cursor, 1)
        }
        None => lookup(normalized),
    }
}

/// Decode the digits of `±HH[:MM[:SS]]`, `±HHMM[SS]`, or a fractional hour,
/// after the sign.
fn numeric_offset(cursor: &mut Cursor<'_>, sign: i32) -> Result<i32, ZoneDiffError> {
    let digits = cursor.read_digits(usize::MAX);
    if digits.is_empty() {
        return Err(ZoneDiffError::NotAZone);
    }

    let seconds = match cursor.peek() {
        Some(b':') => {
            let hour = parse_u32(digits)?;
            cursor.next();
            let minute = parse_u32(cursor.read_digits(usize::MAX))?;
            let second = if cursor.read_optional_tag(b":") {
                parse_u32(cursor.read_digits(usize::MAX))?
            } else {
                0
            };
            if !cursor.remaining().is_empty() {
                return Err(ZoneDiffError::NotAZone);
            }
            // Minutes and seconds are free-form digit runs, not range
            // checked.
            i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second)
        }
        Some(b'.') | Some(b',') => {
            cursor.next();
            let fraction = cursor.read_digits(usize::MAX);
            if fraction.is_empty() || !cursor.remaining().is_empty() {
                return Err(ZoneDiffError::NotAZone);
            }
            let hour = parse_u32(digits)?;
            i64::from(hour) * 3600 + fraction_seconds(fraction)?
        }
        Some(_) => return Err(ZoneDiffError::NotAZone),
        None => {
            let value = parse_u32(digits)?;
            match digits.len() {
                1 | 2 => i64::from(value) * 3600,
                3 | 4 => i64::from(value / 100) * 3600 + i64::from(value % 100) * 60,
                5 | 6 => {
                    i64::from(value / 10_000) * 3600
                        + i64::from(value / 100 % 100) * 60
                        + i64::from(value % 100)
                }
                _ => return Err(ZoneDiffError::NotAZone),
            }
        }
    };

    if seconds >= MAX_OFFSET {
        return Err(ZoneDiffError::NotAZone);
    }
    Ok(sign * seconds as i32)
}

/// Convert a decimal hour fraction to whole seconds.
///
/// The reference accepts fractions down to 2⁻⁸ hours, truncating any
/// sub-second remainder; anything finer is a distinguishable error.
fn fraction_seconds(digits: &[u8]) -> Result<i64, ZoneDiffError> {
    let trimmed_len = match digits.iter().rposition(|&x| x != b'0') {
        Some(position) => position + 1,
        None => return Ok(0),
    };

    // A multiple of 2⁻⁸ has at most eight decimal digits.
    if trimmed_len > 8 {
        return Err(ZoneDiffError::FractionTooPrecise);
    }

    let numerator = parse_u32(&digits[..trimmed_len])?;
    let denominator = 10u64.pow(trimmed_len as u32);

    if (u64::from(numerator) * 256) % denominator != 0 {
        return Err(ZoneDiffError::FractionTooPrecise);
    }

    Ok((3600 * u64::from(numerator) / denominator) as i64)
}

fn parse_u32(digits: &[u8]) -> Result<u32, ZoneDiffError> {
    if digits.is_empty() {
        return Err(ZoneDiffError::NotAZone);
    }
    let mut value: u32 = 0;
    for &digit in digits {
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(u32::from(digit - b'0')))
            .ok_or(ZoneDiffError::NotAZone)?;
    }
    Ok(value)
}

/// Look up a normalized name, honoring the daylight/standard suffix rules.
fn lookup(normalized: &str) -> Result<i32, ZoneDiffError> {
    let (name, daylight) = if let Some(prefix) = normalized.strip_suffix(" DAYLIGHT TIME") {
        (prefix, true)
    } else if let Some(prefix) = normalized.strip_suffix(" DST") {
        (prefix, true)
    } else if let Some(prefix) = normalized.strip_suffix(" STANDARD TIME") {
        (prefix, false)
    } else if let Some(prefix) = normalized.strip_suffix(" DUMMY TIME") {
        (prefix, false)
    } else {
        (normalized, false)
    };

    match ZONETAB.binary_search_by(|&(key, _)| key.cmp(name)) {
        Ok(index) => Ok(ZONETAB[index].1 + if daylight { 3600 } else { 0 }),
        Err(_) => Err(ZoneDiffError::NotAZone),
    }
}

/// Normalize a zone name for lookup: trim, uppercase, and collapse internal
/// whitespace runs to a single space, into the provided buffer. Names that
/// do not fit cannot resolve.
fn normalize<'a>(text: &str, buf: &'a mut [u8; NAME_CAP]) -> Option<&'a str> {
    let mut len = 0;
    let mut pending_space = false;

    for &byte in text.trim().as_bytes() {
        if byte.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            *buf.get_mut(len)? = b' ';
            len += 1;
            pending_space = false;
        }
        *buf.get_mut(len)? = byte.to_ascii_uppercase();
        len += 1;
    }

    if len == 0 {
        return None;
    }
    // Only ASCII-range bytes were uppercased; multi-byte sequences pass
    // through untouched, so the buffer is still valid UTF-8.
    Some(core::str::from_utf8(&buf[..len]).expect("normalization preserves UTF-8"))
}
