use time::PrimitiveDateTime;

/// A calendar date decoded from a packed DOS date field.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct DosDate {
    /// Full year (1980-2107).
    pub year: u16,
    /// Month of the year; 1-12 in a well-formed cabinet.
    pub month: u8,
    /// Day of the month; 1-31 in a well-formed cabinet.
    pub day: u8,
}

/// A time of day decoded from a packed DOS time field.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct DosTime {
    /// Hour of the day.
    pub hour: u8,
    /// Minute of the hour.
    pub minute: u8,
    /// Second of the minute (always even).
    pub second: u8,
}

pub fn date_from_bits(date: u16) -> DosDate {
    DosDate {
        year: (date >> 9) + 1980,
        month: ((date >> 5) & 0xf) as u8,
        day: (date & 0x1f) as u8,
    }
}

pub fn time_from_bits(time: u16) -> DosTime {
    DosTime {
        hour: (time >> 11) as u8,
        minute: ((time >> 5) & 0x3f) as u8,
        second: 2 * (time & 0x1f) as u8,
    }
}

pub fn datetime_from_parts(
    date: DosDate,
    time: DosTime,
) -> Option<PrimitiveDateTime> {
    let month = date.month.try_into().ok()?;
    let date =
        time::Date::from_calendar_date(date.year as i32, month, date.day)
            .ok()?;
    let time = time::Time::from_hms(time.hour, time.minute, time.second).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}
