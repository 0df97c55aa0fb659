//! Run/Set state machine and the field editor.

use crate::{
    bcd::to_bcd,
    time::{TimeRecord, DATE_MASK, MINUTE_MASK, MONTH_MASK, YEAR_MASK},
};

pub const DEFAULT_INTENSITY: u8 = 0x07;
pub const MAX_INTENSITY: u8 = 0x0E;
pub const MAX_EDIT_COUNT: u8 = 99;

/// Seconds and weekday written while any field is being edited.
const EDIT_SECOND: u8 = 0x00;
const EDIT_DAY_OF_WEEK: u8 = 0x01;

/// Editable fields, in the order the Mode button walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Month,
    Day,
    Year,
    Hour,
    Minute,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Month,
        Field::Day,
        Field::Year,
        Field::Hour,
        Field::Minute,
    ];

    /// The field after this one, or `None` once the session is done.
    pub const fn next(self) -> Option<Field> {
        match self {
            Field::Month => Some(Field::Day),
            Field::Day => Some(Field::Year),
            Field::Year => Some(Field::Hour),
            Field::Hour => Some(Field::Minute),
            Field::Minute => None,
        }
    }

    /// Largest count the field accepts.
    pub const fn limit(self) -> u8 {
        match self {
            Field::Month => 12,
            Field::Day => 31,
            Field::Year => 99,
            Field::Hour => 23,
            Field::Minute => 59,
        }
    }

    /// Date fields render on the date view, the rest on the time view.
    pub const fn is_date(self) -> bool {
        matches!(self, Field::Month | Field::Day | Field::Year)
    }

    fn store(self, count: u8, time: &mut TimeRecord) {
        let count = count.min(self.limit());
        match self {
            Field::Month => time.month = to_bcd(count) & MONTH_MASK,
            Field::Day => time.date = to_bcd(count) & DATE_MASK,
            Field::Year => time.year = to_bcd(count) & YEAR_MASK,
            Field::Hour => time.hour = TimeRecord::hour_from_count(count),
            Field::Minute => time.minute = to_bcd(count) & MINUTE_MASK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Run,
    Set(Field),
}

/// Button presses seen this cycle. Each is true at most once per press.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edges {
    pub mode: bool,
    pub increment: bool,
    pub decrement: bool,
}

impl Edges {
    pub const NONE: Edges = Edges {
        mode: false,
        increment: false,
        decrement: false,
    };

    pub const fn is_empty(&self) -> bool {
        !(self.mode || self.increment || self.decrement)
    }
}

/// State owned by the main loop: mode, the time record, the pending edit count
/// and display brightness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    mode: Mode,
    time: TimeRecord,
    edit_count: u8,
    intensity: u8,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Run,
            time: TimeRecord {
                second: 0,
                minute: 0,
                hour: 0,
                day_of_week: 0,
                date: 0,
                month: 0,
                year: 0,
            },
            edit_count: 0,
            intensity: DEFAULT_INTENSITY,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time(&self) -> &TimeRecord {
        &self.time
    }

    pub fn edit_count(&self) -> u8 {
        self.edit_count
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Replaces the record with a fresh copy read from the RTC.
    pub fn set_time(&mut self, time: TimeRecord) {
        self.time = time;
    }

    /// Applies one cycle of button edges (Mode, then Increment, then Decrement)
    /// and commits the field being edited.
    ///
    /// Returns the record to write to the RTC when this cycle closed an edit
    /// session.
    pub fn step(&mut self, edges: Edges) -> Option<TimeRecord> {
        let closed = if edges.mode { self.advance() } else { None };
        if edges.increment {
            self.increment();
        }
        if edges.decrement {
            self.decrement();
        }
        self.commit();
        closed
    }

    /// Writes the pending count into the edited field. No-op in Run mode.
    pub fn commit(&mut self) {
        if let Mode::Set(field) = self.mode {
            field.store(self.edit_count, &mut self.time);
            self.time.second = EDIT_SECOND;
            self.time.day_of_week = EDIT_DAY_OF_WEEK;
        }
    }

    fn advance(&mut self) -> Option<TimeRecord> {
        match self.mode {
            Mode::Run => {
                self.enter(Field::Month);
                None
            }
            Mode::Set(field) => {
                self.commit();
                match field.next() {
                    Some(next) => {
                        self.enter(next);
                        None
                    }
                    None => {
                        self.mode = Mode::Run;
                        self.edit_count = 0;
                        info!("edit session closed: {}", self.time);
                        Some(self.time)
                    }
                }
            }
        }
    }

    fn enter(&mut self, field: Field) {
        debug!("editing {}", field);
        self.mode = Mode::Set(field);
        self.edit_count = 0;
    }

    fn increment(&mut self) {
        match self.mode {
            Mode::Run => {
                self.intensity = (self.intensity + 1).min(MAX_INTENSITY);
                trace!("intensity {=u8:#x}", self.intensity);
            }
            Mode::Set(_) => self.edit_count = (self.edit_count + 1).min(MAX_EDIT_COUNT),
        }
    }

    fn decrement(&mut self) {
        match self.mode {
            Mode::Run => {
                self.intensity = self.intensity.saturating_sub(1);
                trace!("intensity {=u8:#x}", self.intensity);
            }
            Mode::Set(_) => self.edit_count = self.edit_count.saturating_sub(1),
        }
    }
}
