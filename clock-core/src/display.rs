//! Six-digit rendering for a MAX7219 in code-B decode mode.
//!
//! A frame is six `(digit register, nibble)` writes. Blinking ORs the blink
//! mask into the edited field before its digits are pulled out, so a blanked
//! field shows 0xF (code-B blank) on both of its digits.

use crate::{
    bcd::{self, UNITS_MASK},
    clock::{Clock, Field, Mode},
    time::{
        TimeRecord, DATE_TENS_MASK, MINUTE_TENS_MASK, MONTH_TENS_MASK, SECOND_TENS_MASK,
        YEAR_TENS_MASK,
    },
};

pub const REG_DIGIT_0: u8 = 0x01;
pub const REG_DECODE_MODE: u8 = 0x09;
pub const REG_INTENSITY: u8 = 0x0A;
pub const REG_SCAN_LIMIT: u8 = 0x0B;
pub const REG_SHUTDOWN: u8 = 0x0C;

/// Scan digits 0..=5.
pub const SCAN_LIMIT: u8 = 0x05;
/// Code-B decode on every digit.
pub const DECODE_ALL: u8 = 0xFF;
pub const NORMAL_OPERATION: u8 = 0x01;

pub const DIGITS: usize = 6;

/// A display that takes single-register writes.
pub trait DisplayBus {
    type Error;

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

impl<B: DisplayBus> DisplayBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write(register, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitWrite {
    pub register: u8,
    pub value: u8,
}

pub type Frame = [DigitWrite; DIGITS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    Date,
    Time,
}

/// State of the two indicator LEDs.
///
/// In Run mode they show AM/PM. While editing, `am` marks a date field and `pm`
/// a time field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicator {
    pub am: bool,
    pub pm: bool,
}

impl Indicator {
    pub const EDITING_DATE: Indicator = Indicator { am: true, pm: false };
    pub const EDITING_TIME: Indicator = Indicator { am: false, pm: true };

    pub const fn from_time(time: &TimeRecord) -> Self {
        Self {
            am: time.is_12_hour() && !time.is_pm(),
            pm: time.is_pm(),
        }
    }
}

/// Units and tens nibbles of one field, with `blink` ORed over both.
const fn pair(byte: u8, tens_mask: u8, blink: u8) -> [u8; 2] {
    [
        bcd::units(byte | blink),
        bcd::tens(byte, tens_mask) | (blink & UNITS_MASK),
    ]
}

fn frame(fields: [[u8; 2]; 3]) -> Frame {
    let mut out = [DigitWrite { register: 0, value: 0 }; DIGITS];
    let digits = fields.iter().flatten();
    for (i, (slot, value)) in out.iter_mut().zip(digits).enumerate() {
        *slot = DigitWrite {
            register: REG_DIGIT_0 + i as u8,
            value: *value,
        };
    }
    out
}

fn blink_for(editing: Option<Field>, field: Field, blink: u8) -> u8 {
    if editing == Some(field) {
        blink
    } else {
        0
    }
}

/// Year, date, month; units digit first.
pub fn render_date(time: &TimeRecord, editing: Option<Field>, blink: u8) -> Frame {
    frame([
        pair(time.year, YEAR_TENS_MASK, blink_for(editing, Field::Year, blink)),
        pair(time.date, DATE_TENS_MASK, blink_for(editing, Field::Day, blink)),
        pair(time.month, MONTH_TENS_MASK, blink_for(editing, Field::Month, blink)),
    ])
}

/// Seconds, minutes, hours; units digit first.
pub fn render_time(time: &TimeRecord, editing: Option<Field>, blink: u8) -> Frame {
    frame([
        pair(time.second, SECOND_TENS_MASK, 0),
        pair(time.minute, MINUTE_TENS_MASK, blink_for(editing, Field::Minute, blink)),
        pair(time.hour, time.hour_tens_mask(), blink_for(editing, Field::Hour, blink)),
    ])
}

/// Picks the view for the current mode and renders it.
///
/// `view` only matters in Run mode; while editing the field decides.
pub fn render(clock: &Clock, view: View, blink: u8) -> (Frame, Indicator) {
    let time = clock.time();
    match clock.mode() {
        Mode::Run => {
            let frame = match view {
                View::Date => render_date(time, None, 0),
                View::Time => render_time(time, None, 0),
            };
            (frame, Indicator::from_time(time))
        }
        Mode::Set(field) if field.is_date() => {
            (render_date(time, Some(field), blink), Indicator::EDITING_DATE)
        }
        Mode::Set(field) => (render_time(time, Some(field), blink), Indicator::EDITING_TIME),
    }
}

pub fn write_frame<B: DisplayBus>(bus: &mut B, frame: &Frame) -> Result<(), B::Error> {
    for w in frame {
        bus.write(w.register, w.value)?;
    }
    Ok(())
}

pub fn set_intensity<B: DisplayBus>(bus: &mut B, intensity: u8) -> Result<(), B::Error> {
    bus.write(REG_INTENSITY, intensity)
}

/// One-time bring-up: six digits, code-B decode, brightness, leave shutdown.
pub fn configure<B: DisplayBus>(bus: &mut B, intensity: u8) -> Result<(), B::Error> {
    bus.write(REG_SCAN_LIMIT, SCAN_LIMIT)?;
    bus.write(REG_DECODE_MODE, DECODE_ALL)?;
    set_intensity(bus, intensity)?;
    bus.write(REG_SHUTDOWN, NORMAL_OPERATION)
}
