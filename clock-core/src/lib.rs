//! Control logic for a seven-segment digital clock backed by a DS1307-style RTC.
//!
//! Everything here is hardware independent: buses come in through
//! `embedded-hal` traits and the display through [`display::DisplayBus`], so the
//! whole cycle runs on the host under test.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bcd;
pub mod blink;
pub mod clock;
pub mod controller;
pub mod display;
pub mod input;
pub mod rtc;
pub mod time;

pub use blink::Blink;
pub use clock::{Clock, Edges, Field, Mode};
pub use controller::{Controller, Error};
pub use display::{DisplayBus, Indicator, View};
pub use input::{Button, Debouncer};
pub use rtc::Rtc;
pub use time::TimeRecord;
