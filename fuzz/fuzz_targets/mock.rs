use arbitrary::Arbitrary;
use rubytime::{TemporalAccessor, TemporalField};

#[derive(Debug, Arbitrary)]
pub struct MockTime {
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
    pub time_zone: String,
    pub supported: u16,
}

impl TemporalAccessor for MockTime {
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

    fn is_supported(&self, field: TemporalField) -> bool {
        // Drop a pseudo-random subset of fields.
        let bit = field as usize % 16;
        self.supported & (1 << bit) != 0
    }

    fn zone_name(&self) -> Option<&str> {
        if self.time_zone.is_empty() {
            None
        } else {
            Some(&self.time_zone)
        }
    }
}
