//! LED indicator abstractions
//!
//! Two levels: [`Indicators`] is what the sequencer and UI talk to (flash
//! for N ms), [`PositionLeds`] is the raw bar the board driver implements.
//! A blink length of [`BLINK_HOLD`](crate::config::BLINK_HOLD) keeps the LED
//! lit until something else replaces it.

/// Clock LED plus the four-LED position bar, with timeouts.
pub trait Indicators {
    /// Light the clock LED for `ms` milliseconds.
    fn flash_clock(&mut self, ms: u16);

    /// Light position LED `led` (0..4) for `ms` milliseconds, replacing
    /// whatever the bar showed.
    fn show_position(&mut self, led: u8, ms: u16);

    /// Turn the position bar off.
    fn clear_position(&mut self);
}

impl<T: Indicators + ?Sized> Indicators for &mut T {
    fn flash_clock(&mut self, ms: u16) {
        (**self).flash_clock(ms);
    }

    fn show_position(&mut self, led: u8, ms: u16) {
        (**self).show_position(led, ms);
    }

    fn clear_position(&mut self) {
        (**self).clear_position();
    }
}

/// Raw position bar. At most one LED is lit at a time.
pub trait PositionLeds {
    /// Light exactly `led`, or none for `None`.
    fn set(&mut self, led: Option<u8>);
}
