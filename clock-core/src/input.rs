//! Button debouncing for the tick interrupt.
//!
//! Each button has a small integrator fed one raw sample per tick. A press is
//! latched on the released -> pressed transition and handed out once.

use crate::clock::Edges;

/// Consecutive agreeing samples needed to change a button's state.
pub const DEBOUNCE_SAMPLES: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Mode,
    Increment,
    Decrement,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Mode, Button::Increment, Button::Decrement];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Channel {
    integrator: u8,
    pressed: bool,
    latched: bool,
}

impl Channel {
    fn sample(&mut self, raw_pressed: bool) {
        if raw_pressed {
            if self.integrator < DEBOUNCE_SAMPLES {
                self.integrator += 1;
            }
        } else {
            self.integrator = self.integrator.saturating_sub(1);
        }

        if self.integrator == DEBOUNCE_SAMPLES && !self.pressed {
            self.pressed = true;
            self.latched = true;
        } else if self.integrator == 0 {
            self.pressed = false;
        }
    }
}

/// Shared between the tick interrupt (which samples) and the main loop (which
/// takes presses); both sides access it under a lock.
#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    channels: [Channel; 3],
}

impl Debouncer {
    pub const fn new() -> Self {
        const IDLE: Channel = Channel {
            integrator: 0,
            pressed: false,
            latched: false,
        };
        Self {
            channels: [IDLE; 3],
        }
    }

    /// Feeds one raw sample per button, indexed as [`Button::ALL`]. `true`
    /// means the contact is closed.
    pub fn sample(&mut self, raw_pressed: [bool; 3]) {
        for (channel, raw) in self.channels.iter_mut().zip(raw_pressed) {
            channel.sample(raw);
        }
    }

    /// Debounced level, for diagnostics.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.channels[button.index()].pressed
    }

    /// True once per press.
    pub fn take(&mut self, button: Button) -> bool {
        core::mem::take(&mut self.channels[button.index()].latched)
    }

    pub fn edges(&mut self) -> Edges {
        Edges {
            mode: self.take(Button::Mode),
            increment: self.take(Button::Increment),
            decrement: self.take(Button::Decrement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODE_ONLY: [bool; 3] = [true, false, false];
    const NOTHING: [bool; 3] = [false; 3];

    fn feed(d: &mut Debouncer, raw: [bool; 3], ticks: usize) {
        for _ in 0..ticks {
            d.sample(raw);
        }
    }

    #[test]
    fn test_press_needs_stable_samples() {
        let mut d = Debouncer::new();
        feed(&mut d, MODE_ONLY, DEBOUNCE_SAMPLES as usize - 1);
        assert!(!d.is_pressed(Button::Mode));
        assert!(!d.take(Button::Mode));
        d.sample(MODE_ONLY);
        assert!(d.is_pressed(Button::Mode));
        assert!(d.take(Button::Mode));
    }

    #[test]
    fn test_press_reported_once() {
        let mut d = Debouncer::new();
        feed(&mut d, MODE_ONLY, 50);
        assert_eq!(
            d.edges(),
            Edges {
                mode: true,
                ..Edges::NONE
            }
        );
        feed(&mut d, MODE_ONLY, 50);
        assert!(d.edges().is_empty());
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut d = Debouncer::new();
        for _ in 0..20 {
            d.sample(MODE_ONLY);
            d.sample(NOTHING);
        }
        assert!(!d.take(Button::Mode));
    }

    #[test]
    fn test_release_rearms() {
        let mut d = Debouncer::new();
        feed(&mut d, MODE_ONLY, 10);
        assert!(d.take(Button::Mode));
        feed(&mut d, NOTHING, 10);
        assert!(!d.is_pressed(Button::Mode));
        feed(&mut d, MODE_ONLY, 10);
        assert!(d.take(Button::Mode));
    }

    #[test]
    fn test_buttons_are_independent() {
        let mut d = Debouncer::new();
        feed(&mut d, [false, true, true], 10);
        assert_eq!(
            d.edges(),
            Edges {
                mode: false,
                increment: true,
                decrement: true,
            }
        );
    }

    #[test]
    fn test_latch_survives_until_taken() {
        let mut d = Debouncer::new();
        feed(&mut d, MODE_ONLY, 10);
        feed(&mut d, NOTHING, 10);
        assert!(d.take(Button::Mode));
        assert!(!d.take(Button::Mode));
    }
}
