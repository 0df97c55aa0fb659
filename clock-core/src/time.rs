//! The date/time record exactly as the RTC lays it out in registers 0x00..=0x06.

use crate::bcd::{self, UNITS_MASK};

/// Seconds register bit 7. Clear means the oscillator is running.
pub const OSCILLATOR_HALT: u8 = 0x80;
pub const SECOND_TENS_MASK: u8 = 0x70;
pub const MINUTE_TENS_MASK: u8 = 0x70;
pub const MINUTE_MASK: u8 = MINUTE_TENS_MASK | UNITS_MASK;

/// Hours register bit 6: 12-hour mode.
pub const HOUR_12H: u8 = 0x40;
/// Hours register bit 5 in 12-hour mode: PM.
pub const HOUR_PM: u8 = 0x20;
pub const HOUR_12H_TENS_MASK: u8 = 0x10;
pub const HOUR_24H_TENS_MASK: u8 = 0x30;

pub const DAY_OF_WEEK_MASK: u8 = 0x07;
pub const DATE_TENS_MASK: u8 = 0x30;
pub const DATE_MASK: u8 = DATE_TENS_MASK | UNITS_MASK;
pub const MONTH_TENS_MASK: u8 = 0x10;
pub const MONTH_MASK: u8 = MONTH_TENS_MASK | UNITS_MASK;
pub const YEAR_TENS_MASK: u8 = 0xF0;
pub const YEAR_MASK: u8 = YEAR_TENS_MASK | UNITS_MASK;

/// Number of registers the record spans.
pub const LEN: usize = 7;

/// Seven packed fields, in RTC register order.
///
/// Fields hold raw register bytes, status bits included. Values written by the
/// editor always go through [`bcd::to_bcd`] and a field mask first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeRecord {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day_of_week: u8,
    pub date: u8,
    pub month: u8,
    pub year: u8,
}

impl TimeRecord {
    pub const fn from_registers(regs: [u8; LEN]) -> Self {
        Self {
            second: regs[0],
            minute: regs[1],
            hour: regs[2],
            day_of_week: regs[3],
            date: regs[4],
            month: regs[5],
            year: regs[6],
        }
    }

    pub const fn to_registers(&self) -> [u8; LEN] {
        [
            self.second,
            self.minute,
            self.hour,
            self.day_of_week,
            self.date,
            self.month,
            self.year,
        ]
    }

    pub const fn is_12_hour(&self) -> bool {
        self.hour & HOUR_12H != 0
    }

    /// PM is only meaningful in 12-hour mode; in 24-hour mode bit 5 is a tens bit.
    pub const fn is_pm(&self) -> bool {
        self.is_12_hour() && self.hour & HOUR_PM != 0
    }

    pub const fn hour_tens_mask(&self) -> u8 {
        if self.is_12_hour() {
            HOUR_12H_TENS_MASK
        } else {
            HOUR_24H_TENS_MASK
        }
    }

    pub const fn oscillator_halted(&self) -> bool {
        self.second & OSCILLATOR_HALT != 0
    }

    /// Builds a 12-hour-mode hour byte from a 0..=23 count.
    ///
    /// Counts above 12 set the PM bit and are shown as `count - 12`; 12 itself
    /// stays AM.
    pub const fn hour_from_count(count: u8) -> u8 {
        let count = if count > 23 { 23 } else { count };
        if count > 12 {
            HOUR_12H | HOUR_PM | bcd::to_bcd(count - 12)
        } else {
            HOUR_12H | bcd::to_bcd(count)
        }
    }
}
