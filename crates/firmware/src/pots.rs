//! Round-robin pot scanner with movement detection.
//!
//! The ADC converts one pot at a time. A new reading is only adopted when it
//! differs from the stored one by at least `POT_MOVE_TOLERANCE`, which keeps
//! ADC noise from registering as movement.

use platform::config::{NUM_POTS, POT_MOVE_TIMEOUT_MS, POT_MOVE_TOLERANCE};
use platform::PotReading;

/// The four panel pots.
#[derive(Debug, Clone)]
pub struct Pots {
    readings: [PotReading; NUM_POTS],
    channel: usize,
    /// Pot moved since the last `take_moved`.
    moved: Option<usize>,
    /// Last pot moved, while its movement window is open.
    active: Option<usize>,
    move_timeout: u16,
}

impl Pots {
    /// Start from a first full scan.
    pub fn new(initial: [PotReading; NUM_POTS]) -> Self {
        Self {
            readings: initial,
            channel: 0,
            moved: None,
            active: None,
            move_timeout: 0,
        }
    }

    /// Pot the ADC should convert next.
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Conversion result for [`channel`](Self::channel). Moves on to the
    /// next pot.
    pub fn on_sample(&mut self, reading: PotReading) {
        let pot = self.channel;
        if let Some(stored) = self.readings.get_mut(pot) {
            if reading.get().abs_diff(stored.get()) >= POT_MOVE_TOLERANCE {
                *stored = reading;
                self.moved = Some(pot);
                self.active = Some(pot);
                self.move_timeout = POT_MOVE_TIMEOUT_MS;
            }
        }
        self.channel = self.channel.saturating_add(1) % NUM_POTS;
    }

    /// 1 ms tick: close the movement window.
    pub fn on_ms(&mut self) {
        if self.move_timeout > 0 {
            self.move_timeout = self.move_timeout.saturating_sub(1);
            if self.move_timeout == 0 {
                self.active = None;
            }
        }
    }

    /// Pot moved since the previous call, if any.
    pub fn take_moved(&mut self) -> Option<usize> {
        self.moved.take()
    }

    /// Pot being turned right now: moved within the last
    /// `POT_MOVE_TIMEOUT_MS`.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Latest reading of `pot`, centre for an unknown index.
    pub fn reading(&self, pot: usize) -> PotReading {
        self.readings
            .get(pot)
            .copied()
            .unwrap_or(PotReading::CENTER)
    }

    /// All readings, pot 0 first.
    pub fn readings(&self) -> [PotReading; NUM_POTS] {
        self.readings
    }
}

impl Default for Pots {
    fn default() -> Self {
        Self::new([PotReading::CENTER; NUM_POTS])
    }
}
