//! Wall-clock value handed to the renderer on every tick.

/// Calendar time as read from the RTC / NTP collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Day of week, 1 = Sunday .. 7 = Saturday
    pub weekday: u8,
}

impl Default for ClockTime {
    fn default() -> Self {
        Self {
            year: 2000,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            weekday: 7,
        }
    }
}

impl ClockTime {
    /// Hour on a 12 hour dial, midnight and noon read as 12.
    pub const fn hour_12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            hour => hour,
        }
    }

    /// Two digit year, years before 2000 read as 00.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn short_year(&self) -> u8 {
        (self.year.saturating_sub(2000) % 100) as u8
    }
}
