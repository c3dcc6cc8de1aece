#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::cast_possible_truncation)]
#![allow(unknown_lints)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_op_in_unsafe_fn)]
#![warn(unused_qualifications)]
#![warn(variant_size_differences)]
// Enable feature callouts in generated documentation:
// https://doc.rust-lang.org/beta/unstable-book/language-features/doc-cfg.html
//
// This approach is borrowed from tokio.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, feature(doc_alias))]

/*!
This crate parses and formats date-time strings with Ruby's
`strftime`/`strptime` directive language, reproducing the reference
runtime's parsing quirks: its time-zone abbreviation table, the `%Q`/`%s`
epoch directives, leap-second input, hour 24, and signed epoch-millisecond
semantics.

A pattern is first compiled into a [`Format`] — an immutable sequence of
immediate literals and directives. Compilation is total: anything that is
not a recognized directive is carried as literal text. The same compiled
format drives both engines:

- [`parse`] matches an input string and resolves it into a
  [`ResolvedTimestamp`] (an instant with offset);
- [`parse_unresolved`] stops at the raw [`Parsed`] field record;
- [`format`] renders any [`TemporalAccessor`] implementation.

Each directive consists of a percent `%` character, zero or more flags,
optional minimum field width, optional modifier and a conversion specifier
as follows:

```text
%<flags><width><modifier><conversion>
```

The parsing engine honors none of the flags; [`Format::only_for_formatter`]
reports whether a compiled format carries any.

## Flags

| Flag | Description                                                                            |
|------|----------------------------------------------------------------------------------------|
|  `-` | Use left padding, ignoring width and removing all other padding options in most cases. |
|  `_` | Use spaces for padding.                                                                |
|  `0` | Use zeros for padding.                                                                 |
|  `^` | Convert the resulting string to uppercase.                                             |
|  `#` | Change case of the resulting string.                                                   |

## Width

The minimum field width specifies the minimum width.

## Modifiers

The modifiers are `E` and `O`. They are ignored.

## Specifiers

| Specifier  | Example       | Description                                                                                                           |
|------------|---------------|-----------------------------------------------------------------------------------------------------------------------|
|    `%Y`    | `-2001`       | Year with century if provided, zero-padded to at least 4 digits plus the possible negative sign.                      |
|    `%C`    | `-21`         | `Year / 100` using Euclidean division, zero-padded to at least 2 digits.                                              |
|    `%y`    | `99`          | `Year % 100` in `00..=99`, using Euclidean remainder, zero-padded to 2 digits.                                        |
|    `%m`    | `01`          | Month of the year in `01..=12`, zero-padded to 2 digits.                                                              |
|    `%B`    | `July`        | Locale independent full month name.                                                                                   |
| `%b`, `%h` | `Jul`         | Locale independent abbreviated month name, using the first 3 letters.                                                 |
|    `%d`    | `01`          | Day of the month in `01..=31`, zero-padded to 2 digits.                                                               |
|    `%e`    | ` 1`          | Day of the month in ` 1..=31`, blank-padded to 2 digits.                                                              |
|    `%j`    | `001`         | Day of the year in `001..=366`, zero-padded to 3 digits.                                                              |
|    `%H`    | `00`          | Hour of the day (24-hour clock) in `00..=23`, zero-padded to 2 digits.                                                |
|    `%k`    | ` 0`          | Hour of the day (24-hour clock) in ` 0..=23`, blank-padded to 2 digits.                                               |
|    `%I`    | `01`          | Hour of the day (12-hour clock) in `01..=12`, zero-padded to 2 digits.                                                |
|    `%l`    | ` 1`          | Hour of the day (12-hour clock) in ` 1..=12`, blank-padded to 2 digits.                                               |
|    `%P`    | `am`          | Lowercase meridian indicator (`"am"` or `"pm"`).                                                                      |
|    `%p`    | `AM`          | Uppercase meridian indicator (`"AM"` or `"PM"`).                                                                      |
|    `%M`    | `00`          | Minute of the hour in `00..=59`, zero-padded to 2 digits.                                                             |
|    `%S`    | `00`          | Second of the minute in `00..=60`, zero-padded to 2 digits.                                                           |
|    `%L`    | `123`         | Truncated fractional seconds digits, with 3 digits by default. Number of digits is specified by the width field.      |
|    `%N`    | `123456789`   | Truncated fractional seconds digits, with 9 digits by default. Number of digits is specified by the width field.      |
|    `%z`    | `+0200`       | Zero-padded signed time zone UTC hour and minute offsets (`+hhmm`).                                                   |
|    `%:z`   | `+02:00`      | Zero-padded signed time zone UTC hour and minute offsets with colons (`+hh:mm`).                                      |
|    `%::z`  | `+02:00:00`   | Zero-padded signed time zone UTC hour, minute and second offsets with colons (`+hh:mm:ss`).                           |
|    `%:::z` | `+02`         | Zero-padded signed time zone UTC hour offset, with optional minute and second offsets with colons (`+hh[:mm[:ss]]`).  |
|    `%Z`    | `CEST`        | Time zone name when the accessor carries one, otherwise the `+hh:mm` offset.                                          |
|    `%A`    | `Sunday`      | Locale independent full weekday name.                                                                                 |
|    `%a`    | `Sun`         | Locale independent abbreviated weekday name, using the first 3 letters.                                               |
|    `%u`    | `1`           | Day of the week from Monday in `1..=7`, zero-padded to 1 digit.                                                       |
|    `%w`    | `0`           | Day of the week from Sunday in `0..=6`, zero-padded to 1 digit.                                                       |
|    `%G`    | `-2001`       | Same as `%Y`, but using the ISO 8601 week-based year. [^1]                                                            |
|    `%g`    | `99`          | Same as `%y`, but using the ISO 8601 week-based year. [^1]                                                            |
|    `%V`    | `01`          | ISO 8601 week number in `01..=53`, zero-padded to 2 digits. [^1]                                                      |
|    `%U`    | `00`          | Week number from Sunday in `00..=53`, zero-padded to 2 digits. The week `1` starts with the first Sunday of the year. |
|    `%W`    | `00`          | Week number from Monday in `00..=53`, zero-padded to 2 digits. The week `1` starts with the first Monday of the year. |
|    `%s`    | `86400`       | Number of seconds since `1970-01-01 00:00:00 UTC`, zero-padded to at least 1 digit.                                   |
|    `%Q`    | `86400000`    | Number of milliseconds since `1970-01-01 00:00:00 UTC`, zero-padded to at least 1 digit.                              |
|    `%n`    | `\n`          | Newline character `'\n'`.                                                                                             |
|    `%t`    | `\t`          | Tab character `'\t'`.                                                                                                 |
|    `%%`    | `%`           | Literal `'%'` character.                                                                                              |
|    `%c`    | `Sun Jul  8 00:23:45 2001` | Date and time, equivalent to `"%a %b %e %H:%M:%S %Y"`.                                                   |
| `%D`, `%x` | `07/08/01`    | Date, equivalent to `"%m/%d/%y"`.                                                                                     |
|    `%F`    | `2001-07-08`  | ISO 8601 date, equivalent to `"%Y-%m-%d"`.                                                                            |
|    `%v`    | ` 8-Jul-2001` | VMS date, equivalent to `"%e-%b-%Y"`.                                                                                 |
|    `%r`    | `12:23:45 AM` | 12-hour time, equivalent to `"%I:%M:%S %p"`.                                                                          |
|    `%R`    | `00:23`       | 24-hour time without seconds, equivalent to `"%H:%M"`.                                                                |
| `%T`, `%X` | `00:23:45`    | 24-hour time, equivalent to `"%H:%M:%S"`.                                                                             |
|    `%+`    | `Sun Jul  8 00:23:45 UTC 2001` | Date, time and zone, equivalent to `"%a %b %e %H:%M:%S %Z %Y"`.                                      |

[^1]: `%G`, `%g`, `%V`: Week 1 of ISO 8601 is the first week with at least 4
days in that year. The days before the first week are in the last week of the
previous year.

## Parsing

The parsing engine follows the reference runtime rather than the strict
reading of the table above: literal whitespace in the pattern matches any
nonzero whitespace run; month and weekday names match the full English name
or its three-letter prefix (`"Januari"` parses as January with `"uari"`
left over); hour 24 and the leap second 60 are accepted and roll over;
calendar values such as month 13 parse and are rejected at resolution. The
`%z`/`%Z` acceptor takes zone abbreviations, Windows-style long names with
`STANDARD TIME`/`DAYLIGHT TIME`/`DST` suffixes, and numeric offsets
including `GMT`/`UTC`-prefixed fractional hours.

Resolution precedence: an epoch directive (`%s`/`%Q`, the later one wins)
overrides calendar fields; otherwise the civil fields are combined in the
parsed offset (or the caller's default), with missing date fields falling
back to 1970-01-01 and missing time fields to midnight.

# Examples

```
use rubytime::{Format, ResolverOptions};

let format = Format::compile("%Y-%m-%dT%H:%M:%S%z");
let timestamp = rubytime::parse(&format, "2022-07-08T12:34:56+0900", &ResolverOptions::default())?;
assert_eq!(timestamp.epoch_second(), 1_657_251_296);
assert_eq!(timestamp.offset_seconds(), 32_400);

// A resolved timestamp is itself a temporal accessor.
let printable = Format::compile("%Y-%m-%d %H:%M:%S");
assert_eq!(rubytime::format(&printable, &timestamp), "2022-07-08 12:34:56");
# Ok::<(), rubytime::ParseError>(())
```

Epoch directives, last one wins:

```
use rubytime::{Format, ResolverOptions};

let format = Format::compile("%s.%N");
let timestamp = rubytime::parse(&format, "1500000000.123456789", &ResolverOptions::default())?;
assert_eq!(timestamp.epoch_second(), 1_500_000_000);
assert_eq!(timestamp.nano_of_second(), 123_456_789);
# Ok::<(), rubytime::ParseError>(())
```
*/
#![doc(html_root_url = "https://docs.rs/rubytime/0.1.0")]

#[cfg(feature = "alloc")]
extern crate alloc;

mod assert;
#[cfg(feature = "alloc")]
mod civil;
#[cfg(feature = "alloc")]
mod format;
#[cfg(feature = "alloc")]
mod strftime;
#[cfg(feature = "alloc")]
mod strptime;
mod utils;
mod zone;

#[cfg(test)]
mod tests;

use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::String;

#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub use crate::format::{Directive, DirectiveOptions, Format, FormatToken, Padding};
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub use crate::strptime::{
    Decimal, Element, ElementsWithFractionInDecimal, ElementsWithFractionInRational, Epoch,
    Meridian, ParseError, ParseErrorKind, Parsed, ParsedQuery, Rational, ResolvedTimestamp,
    ResolverOptions,
};
pub use crate::zone::resolve_offset;

/// Error type returned by the formatting functions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// Formatted string is too large and could cause an out-of-memory
    /// error.
    FormattedStringTooLarge,
    /// Provided buffer for the [`buffered::format`] function is too small
    /// for the formatted string.
    ///
    /// This corresponds to the [`std::io::ErrorKind::WriteZero`] variant.
    ///
    /// [`std::io::ErrorKind::WriteZero`]: <https://doc.rust-lang.org/std/io/enum.ErrorKind.html#variant.WriteZero>
    WriteZero,
    /// Formatting error, corresponding to [`core::fmt::Error`].
    FmtError,
    /// Allocation failure while growing the output buffer.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    OutOfMemory(alloc::collections::TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormattedStringTooLarge => write!(f, "formatted string too large"),
            Error::WriteZero => write!(f, "failed to write the whole buffer"),
            Error::FmtError => write!(f, "formatter error"),
            #[cfg(feature = "alloc")]
            Error::OutOfMemory(_) => write!(f, "allocation failure"),
        }
    }
}

#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
impl From<alloc::collections::TryReserveError> for Error {
    fn from(error: alloc::collections::TryReserveError) -> Self {
        Error::OutOfMemory(error)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OutOfMemory(error) => Some(error),
            _ => None,
        }
    }
}

/// Fields a [`TemporalAccessor`] can answer for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TemporalField {
    /// Seconds since 1970-01-01T00:00:00Z, ignoring leap seconds.
    InstantSeconds,
    /// Nanosecond-of-second in `0..=999_999_999`.
    NanoOfSecond,
    /// Offset from UTC in seconds.
    OffsetSeconds,
    /// Proleptic Gregorian year of the local date.
    Year,
    /// Month of the year in `1..=12`.
    MonthOfYear,
    /// Day of the month in `1..=31`.
    DayOfMonth,
    /// Day of the year in `1..=366`.
    DayOfYear,
    /// Day of the week in `0..=6`, with `Sunday == 0`.
    DayOfWeek,
    /// Hour of the day in `0..=23`.
    HourOfDay,
    /// Minute of the hour in `0..=59`.
    MinuteOfHour,
    /// Second of the minute in `0..=60`.
    SecondOfMinute,
}

/// Read-only field interface of the host date-time value.
///
/// The formatting engine pulls every field through this trait; a field
/// that is unsupported (or out of range) renders as an empty run.
/// [`DayOfYear`] and [`DayOfWeek`] are derived from the civil date when
/// unsupported, so most implementations only need the civil fields.
///
/// [`DayOfYear`]: TemporalField::DayOfYear
/// [`DayOfWeek`]: TemporalField::DayOfWeek
///
/// # Examples
///
/// ```
/// use rubytime::{Format, TemporalAccessor, TemporalField};
///
/// struct Moment;
///
/// impl TemporalAccessor for Moment {
///     fn get_long(&self, field: TemporalField) -> i64 {
///         match field {
///             TemporalField::Year => 1999,
///             TemporalField::MonthOfYear => 7,
///             TemporalField::DayOfMonth => 29,
///             _ => 0,
///         }
///     }
///
///     fn is_supported(&self, field: TemporalField) -> bool {
///         matches!(
///             field,
///             TemporalField::Year | TemporalField::MonthOfYear | TemporalField::DayOfMonth
///         )
///     }
/// }
///
/// let format = Format::compile("%A, %B %e");
/// assert_eq!(rubytime::format(&format, &Moment), "Thursday, July 29");
/// ```
pub trait TemporalAccessor {
    /// Value of the provided field.
    fn get_long(&self, field: TemporalField) -> i64;

    /// Whether the provided field is available.
    fn is_supported(&self, field: TemporalField) -> bool;

    /// Name of the time zone, when one is known.
    fn zone_name(&self) -> Option<&str> {
        None
    }
}

// Check that the TemporalAccessor trait is object-safe
const _: Option<&dyn TemporalAccessor> = None;

/// Parse an input string against a compiled format and resolve it into an
/// instant with offset.
///
/// # Errors
///
/// Fails fast at the first mismatch, carrying the cursor index and the
/// failure kind; resolver rejections surface as
/// [`ParseErrorKind::InvalidCalendar`].
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn parse(
    format: &Format,
    input: &str,
    options: &ResolverOptions,
) -> Result<ResolvedTimestamp, ParseError> {
    let parsed = parse_unresolved(format, input)?;
    parsed
        .resolve(options)
        .map_err(|error| error.with_format(format))
}

/// Parse an input string against a compiled format, returning the raw
/// field record without resolving it.
///
/// # Errors
///
/// Fails fast at the first mismatch, carrying the cursor index and the
/// failure kind.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn parse_unresolved(format: &Format, input: &str) -> Result<Parsed, ParseError> {
    strptime::TimeParser::new(format, input).parse()
}

/// Render a temporal accessor against a compiled format.
///
/// Directives whose fields the accessor does not supply render as empty
/// runs. Output beyond the size cap (512 KiB per pattern byte) is
/// truncated; the [`buffered::format`] entry point surfaces write errors
/// instead.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub fn format(format: &Format, time: &impl TemporalAccessor) -> String {
    let mut buf = alloc::vec::Vec::new();
    // Against a growable buffer only the size cap can fail; the cap
    // policy is truncation.
    let _ = strftime::TimeFormatter::new(time, format).fmt(&mut buf);

    match String::from_utf8(buf) {
        Ok(text) => text,
        Err(error) => {
            // The cap can split a multi-byte literal; drop the partial
            // character.
            let valid = error.utf8_error().valid_up_to();
            let mut bytes = error.into_bytes();
            bytes.truncate(valid);
            String::from_utf8(bytes).expect("bytes were truncated at a valid boundary")
        }
    }
}

/// Provides a `format` implementation writing into a caller-provided
/// buffer, usable without an allocator.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
pub mod buffered {
    use crate::strftime::TimeFormatter;
    use crate::{Error, Format, TemporalAccessor};

    /// Format a temporal accessor with the compiled format, writing into
    /// the provided buffer and returning the written subslice.
    ///
    /// # Errors
    ///
    /// Can produce an [`Error`](crate::Error) when the formatting fails,
    /// including [`Error::WriteZero`](crate::Error::WriteZero) when the
    /// buffer is too small.
    pub fn format<'a>(
        format: &Format,
        time: &impl TemporalAccessor,
        buf: &'a mut [u8],
    ) -> Result<&'a mut [u8], Error> {
        let len = buf.len();

        let mut cursor = &mut buf[..];
        TimeFormatter::new(time, format).fmt(&mut cursor)?;
        let remaining_len = cursor.len();

        Ok(&mut buf[..len - remaining_len])
    }
}
