//! Walks the tempo map against the bar position.

use platform::config::{BLINK_LONG_MS, BLINK_MEDIUM_MS, BLINK_SHORT_MS, NUM_POSITION_LEDS};
use platform::{Indicators, TriggerOutput};
use timebase::ClockEvents;

use crate::reset::ResetMode;
use crate::tempo_map::TempoMap;

/// What the poll loop read from the tick context, atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    /// Bar position, 0–65535.
    pub position: u16,
    /// Events raised since the previous snapshot.
    pub events: ClockEvents,
    /// Reset-jack gate.
    pub output_enabled: bool,
}

/// Trigger scheduler.
///
/// Each [`advance`](Self::advance) fires every trigger whose position has
/// been reached since the previous call, exactly once per bar:
///
/// 1. `RESTART` drops the rest of the old bar and rewinds the cursor.
/// 2. Otherwise a position lower than last time means the bar wrapped;
///    the rest of the old bar fires first, then the cursor rewinds.
/// 3. Every trigger with `position <= now` fires in index order.
///
/// A muted sequencer still moves its cursor, so unmuting never releases a
/// burst of stale triggers.
#[derive(Debug, Clone)]
pub struct Sequencer {
    cursor: usize,
    last_position: u16,
    reset_mode: ResetMode,
    /// `OneShot` has played its bar and waits for the next restart.
    one_shot_spent: bool,
}

impl Sequencer {
    /// Cursor at the start of the bar, `Restart` mode.
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            last_position: 0,
            reset_mode: ResetMode::Restart,
            one_shot_spent: false,
        }
    }

    /// Process one poll of the timebase. Returns how many triggers reached
    /// the output.
    pub fn advance<O, L>(
        &mut self,
        snap: ClockSnapshot,
        map: &TempoMap,
        out: &mut O,
        leds: &mut L,
    ) -> usize
    where
        O: TriggerOutput,
        L: Indicators,
    {
        let mut fired = 0usize;

        if snap.events.contains(ClockEvents::RESTART) {
            leds.flash_clock(BLINK_LONG_MS);
            self.cursor = 0;
            self.one_shot_spent = false;
        } else {
            if snap.events.contains(ClockEvents::STEP) {
                let ms = if snap.events.contains(ClockEvents::BEAT) {
                    BLINK_MEDIUM_MS
                } else {
                    BLINK_SHORT_MS
                };
                leds.flash_clock(ms);
            }
            if snap.position < self.last_position {
                let enabled = self.output_enabled(snap.output_enabled);
                while self.cursor < map.num_trigs() {
                    fired = fired.saturating_add(self.fire(map, enabled, out, leds));
                }
                self.cursor = 0;
                if self.reset_mode == ResetMode::OneShot {
                    self.one_shot_spent = true;
                }
            }
        }

        let enabled = self.output_enabled(snap.output_enabled);
        while map
            .trig(self.cursor)
            .is_some_and(|trig| trig <= snap.position)
        {
            fired = fired.saturating_add(self.fire(map, enabled, out, leds));
        }

        self.last_position = snap.position;
        fired
    }

    /// Change how the reset jack is interpreted. Leaving `OneShot` unmutes.
    pub fn set_reset_mode(&mut self, mode: ResetMode) {
        self.reset_mode = mode;
        if mode != ResetMode::OneShot {
            self.one_shot_spent = false;
        }
    }

    /// Keep the cursor in range after the tempo map changed.
    ///
    /// The cursor is an index into the bar, so triggers already passed stay
    /// passed. Any trigger of the new map that now lies behind the position
    /// fires on the next [`advance`](Self::advance).
    pub fn resync(&mut self, map: &TempoMap) {
        self.cursor = self.cursor.min(map.num_trigs());
    }

    /// Next trigger index to fire.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position seen by the previous `advance`.
    pub fn last_position(&self) -> u16 {
        self.last_position
    }

    /// Current reset mode.
    pub fn reset_mode(&self) -> ResetMode {
        self.reset_mode
    }

    /// Whether `OneShot` has finished its bar.
    pub fn is_one_shot_spent(&self) -> bool {
        self.one_shot_spent
    }

    fn output_enabled(&self, gate: bool) -> bool {
        gate && !self.one_shot_spent
    }

    /// Pass trigger `cursor`: drive the output if enabled, move the
    /// position LED, advance the cursor.
    fn fire<O, L>(&mut self, map: &TempoMap, enabled: bool, out: &mut O, leds: &mut L) -> usize
    where
        O: TriggerOutput,
        L: Indicators,
    {
        let index = self.cursor;
        let n = map.num_trigs().max(1);
        let led = index
            .saturating_mul(usize::from(NUM_POSITION_LEDS))
            .checked_div(n)
            .and_then(|led| u8::try_from(led).ok())
            .unwrap_or(0);
        let ms = if index % 4 == 0 {
            BLINK_MEDIUM_MS
        } else {
            BLINK_SHORT_MS
        };
        leds.show_position(led, ms);

        self.cursor = self.cursor.saturating_add(1);
        if enabled {
            out.trigger();
            1
        } else {
            0
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
