//! Week-number arithmetic for the `%U`/`%W`/`%G`/`%g`/`%V` directives.

use crate::civil::is_leap_year;

/// Start day of the week.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum WeekStart {
    /// Sunday.
    Sunday = 0,
    /// Monday.
    Monday = 1,
}

/// Compute the week number in `0..=53`, where week 1 starts with the first
/// `week_start` day of the year.
///
/// `weekday` is the day of the week from Sunday in `0..=6`; `year_day` is
/// the day of the year in `1..=366`.
pub(crate) fn week_number(weekday: i64, year_day: i64, week_start: WeekStart) -> i64 {
    let year_day = year_day - 1;
    let first_week_start = (year_day - weekday + week_start as i64).rem_euclid(7);
    (year_day + 7 - first_week_start) / 7
}

/// Compute the ISO 8601 week-based year and week number.
///
/// Week 1 of a year is the first week with at least four days in that year;
/// days before it belong to the last week of the previous year.
pub(crate) fn iso_week_based_year_and_week(year: i64, weekday: i64, year_day: i64) -> (i64, i64) {
    let (year, year_day) = match iso_first_week_start(weekday, year_day) {
        // Day before week 1: it closes out the previous year.
        start if year_day - 1 < start => {
            let previous_year = year - 1;
            let days = if is_leap_year(previous_year) { 366 } else { 365 };
            (previous_year, year_day + days)
        }
        _ => (year, year_day),
    };

    let start = iso_first_week_start(weekday, year_day);
    let week = (year_day - 1 + 7 - start) / 7;

    if week >= 52 {
        // The trailing Monday-to-Wednesday of December may open week 1 of
        // the next year.
        let last_day = if is_leap_year(year) { 365 } else { 364 };
        let last_day_weekday = (weekday + last_day - (year_day - 1)).rem_euclid(7);

        if (1..=3).contains(&last_day_weekday) {
            let last_monday = last_day - (last_day_weekday - 1);
            if year_day - 1 >= last_monday {
                return (year + 1, 1);
            }
        }
    }

    (year, week)
}

/// Day-of-year index (0-based) of the Monday starting ISO week 1, possibly
/// negative when week 1 starts in the previous December.
fn iso_first_week_start(weekday: i64, year_day: i64) -> i64 {
    let mut start = (year_day - 1 - weekday + 1).rem_euclid(7);
    if start > 3 {
        start -= 7;
    }
    start
}
