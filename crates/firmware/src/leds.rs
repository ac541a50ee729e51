//! Clock LED and position bar with per-LED timeouts.

use embedded_hal::digital::OutputPin;
use platform::config::{BLINK_HOLD, NUM_POSITION_LEDS};
use platform::{Indicators, PositionLeds};

/// Countdown for one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Off,
    Hold,
    For(u16),
}

impl Timer {
    fn from_ms(ms: u16) -> Self {
        if ms == BLINK_HOLD {
            Self::Hold
        } else {
            Self::For(ms)
        }
    }

    /// Count one millisecond. Returns `true` when the LED has to go dark.
    fn tick(&mut self) -> bool {
        if let Self::For(left) = *self {
            let left = left.saturating_sub(1);
            if left == 0 {
                *self = Self::Off;
                return true;
            }
            *self = Self::For(left);
        }
        false
    }

    fn is_lit(self) -> bool {
        self != Self::Off
    }
}

/// Panel LEDs: a clock LED on its own pin and a position bar.
#[derive(Debug)]
pub struct Leds<C, B> {
    clock: C,
    bar: B,
    clock_timer: Timer,
    bar_timer: Timer,
}

impl<C: OutputPin, B: PositionLeds> Leds<C, B> {
    /// Everything dark.
    pub fn new(mut clock: C, mut bar: B) -> Self {
        let _ = clock.set_low();
        bar.set(None);
        Self {
            clock,
            bar,
            clock_timer: Timer::Off,
            bar_timer: Timer::Off,
        }
    }

    /// 1 ms tick: put out whatever has expired.
    pub fn on_ms(&mut self) {
        if self.clock_timer.tick() {
            let _ = self.clock.set_low();
        }
        if self.bar_timer.tick() {
            self.bar.set(None);
        }
    }

    /// Whether the clock LED is lit.
    pub fn clock_lit(&self) -> bool {
        self.clock_timer.is_lit()
    }

    /// Whether the position bar shows anything.
    pub fn bar_lit(&self) -> bool {
        self.bar_timer.is_lit()
    }

    /// The bar driver, for inspection.
    pub fn bar(&self) -> &B {
        &self.bar
    }
}

impl<C: OutputPin, B: PositionLeds> Indicators for Leds<C, B> {
    fn flash_clock(&mut self, ms: u16) {
        let _ = self.clock.set_high();
        self.clock_timer = Timer::from_ms(ms);
    }

    fn show_position(&mut self, led: u8, ms: u16) {
        self.bar.set(Some(led));
        self.bar_timer = Timer::from_ms(ms);
    }

    fn clear_position(&mut self) {
        self.bar.set(None);
        self.bar_timer = Timer::Off;
    }
}

/// Position bar on one GPIO per LED.
#[derive(Debug)]
pub struct PinBar<P> {
    pins: [P; NUM_POSITION_LEDS as usize],
}

impl<P: OutputPin> PinBar<P> {
    /// LEDs in bar order, first to last.
    pub fn new(pins: [P; NUM_POSITION_LEDS as usize]) -> Self {
        Self { pins }
    }
}

impl<P: OutputPin> PositionLeds for PinBar<P> {
    fn set(&mut self, led: Option<u8>) {
        for (i, pin) in (0u8..).zip(self.pins.iter_mut()) {
            let _ = if Some(i) == led {
                pin.set_high()
            } else {
                pin.set_low()
            };
        }
    }
}
