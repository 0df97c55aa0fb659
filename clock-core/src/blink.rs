//! Free-running blink scheduler advanced by the periodic tick.

/// Ticks per blink half-period.
pub const BLINK_HALF_PERIOD: u8 = 100;

/// Byte ORed into a field while it is blanked.
pub const BLINK_ON: u8 = 0xFF;

/// Shared between the tick interrupt and the main loop, so every access goes
/// through a lock held by the owner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    count: u8,
    flag: bool,
}

impl Blink {
    pub const fn new() -> Self {
        Self { count: 0, flag: false }
    }

    /// Advances one tick. Returns true when the flag flipped.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= BLINK_HALF_PERIOD {
            self.count = 0;
            self.flag = !self.flag;
            true
        } else {
            false
        }
    }

    pub const fn flag(&self) -> bool {
        self.flag
    }

    /// Mask to OR into the edited field: all ones while blanked, else zero.
    pub const fn mask(&self) -> u8 {
        if self.flag {
            BLINK_ON
        } else {
            0x00
        }
    }
}
