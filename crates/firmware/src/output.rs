//! Trigger output pulse shaper.
//!
//! Every trigger occupies the jack for `OUTPUT_PULSE_MS + OUTPUT_LOW_MS`:
//! high first, then low so that back-to-back triggers stay distinct on the
//! receiving module. Triggers that arrive while a pulse is in flight are
//! counted and played one after another.
//!
//! ```text
//!  trigger() ×2
//!      │
//!      ▼
//!      ┌──────────┐     ┌──────────┐
//!  ────┘  10 ms   └─5ms─┘  10 ms   └─5ms──
//! ```

use embedded_hal::digital::OutputPin;
use platform::config::{OUTPUT_LOW_MS, OUTPUT_PULSE_MS};
use platform::TriggerOutput;

/// Milliseconds one trigger keeps the output busy.
const SLOT_MS: u8 = OUTPUT_PULSE_MS.saturating_add(OUTPUT_LOW_MS);

/// Drives the trigger output jack.
#[derive(Debug)]
pub struct TriggerOut<P> {
    pin: P,
    high: bool,
    /// Milliseconds left in the current slot, 0 when idle.
    timeout: u8,
    pending: u8,
}

impl<P: OutputPin> TriggerOut<P> {
    /// Take the pin and drive it low.
    pub fn new(pin: P) -> Self {
        let mut out = Self {
            pin,
            high: true,
            timeout: 0,
            pending: 0,
        };
        out.drive(false);
        out
    }

    /// 1 ms tick: end the high phase, finish the slot, or start the next
    /// queued pulse.
    pub fn on_ms(&mut self) {
        if self.timeout > 0 {
            self.timeout = self.timeout.saturating_sub(1);
            if self.timeout <= OUTPUT_LOW_MS {
                self.drive(false);
            }
        } else if self.pending > 0 {
            self.pending = self.pending.saturating_sub(1);
            self.start();
        }
    }

    /// Whether the jack is high right now.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Triggers waiting behind the current pulse.
    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Whether a pulse is in flight or queued.
    pub fn is_busy(&self) -> bool {
        self.timeout > 0 || self.pending > 0
    }

    /// The output pin.
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }

    fn start(&mut self) {
        self.drive(true);
        self.timeout = SLOT_MS;
    }

    fn drive(&mut self, high: bool) {
        if self.high == high {
            return;
        }
        self.high = high;
        // GPIO writes on the target cannot fail; a failing test double is
        // caught by its own expectations.
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

impl<P: OutputPin> TriggerOutput for TriggerOut<P> {
    fn trigger(&mut self) {
        if self.timeout > 0 {
            self.pending = self.pending.saturating_add(1);
        } else {
            self.start();
        }
    }
}
