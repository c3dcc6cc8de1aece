mod props;
mod strftime;
mod strptime;

use crate::{Format, TemporalAccessor, TemporalField};

/// Test accessor with every field supported.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MockTime<'a> {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub nanoseconds: i64,
    pub day_of_week: i64,
    pub day_of_year: i64,
    pub to_int: i64,
    pub offset: i64,
    pub time_zone: &'a str,
}

impl<'a> MockTime<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        nanoseconds: i64,
        day_of_week: i64,
        day_of_year: i64,
        to_int: i64,
        offset: i64,
        time_zone: &'a str,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanoseconds,
            day_of_week,
            day_of_year,
            to_int,
            offset,
            time_zone,
        }
    }
}

impl TemporalAccessor for MockTime<'_> {
    fn get_long(&self, field: TemporalField) -> i64 {
        match field {
            TemporalField::InstantSeconds => self.to_int,
            TemporalField::NanoOfSecond => self.nanoseconds,
            TemporalField::OffsetSeconds => self.offset,
            TemporalField::Year => self.year,
            TemporalField::MonthOfYear => self.month,
            TemporalField::DayOfMonth => self.day,
            TemporalField::DayOfYear => self.day_of_year,
            TemporalField::DayOfWeek => self.day_of_week,
            TemporalField::HourOfDay => self.hour,
            TemporalField::MinuteOfHour => self.minute,
            TemporalField::SecondOfMinute => self.second,
        }
    }

    fn is_supported(&self, _field: TemporalField) -> bool {
        true
    }

    fn zone_name(&self) -> Option<&str> {
        if self.time_zone.is_empty() {
            None
        } else {
            Some(self.time_zone)
        }
    }
}

/// Accessor supporting only the listed fields, for the empty-substitution
/// tests.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PartialTime<'a> {
    pub inner: MockTime<'a>,
    pub supported: &'a [TemporalField],
}

impl TemporalAccessor for PartialTime<'_> {
    fn get_long(&self, field: TemporalField) -> i64 {
        self.inner.get_long(field)
    }

    fn is_supported(&self, field: TemporalField) -> bool {
        self.supported.contains(&field)
    }

    fn zone_name(&self) -> Option<&str> {
        self.inner.zone_name()
    }
}

pub(crate) fn check_format(time: &MockTime<'_>, pattern: &str, expected: &str) {
    const SIZE: usize = 100;
    let mut buf = [0u8; SIZE];

    let format = Format::compile(pattern);
    let written = crate::buffered::format(&format, time, &mut buf).unwrap();

    assert_eq!(
        core::str::from_utf8(written).unwrap(),
        expected,
        "pattern {:?}",
        pattern
    );
}

pub(crate) fn check_all(times: &[MockTime<'_>], pattern: &str, all_expected: &[&str]) {
    assert_eq!(times.len(), all_expected.len());
    for (time, expected) in times.iter().zip(all_expected) {
        check_format(time, pattern, expected);
    }
}
