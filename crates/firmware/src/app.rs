//! The poll loop: UI, tempo map and sequencer.
//!
//! Runs once per millisecond at thread priority. It never touches the
//! timebase directly; everything goes through [`SharedClock`].

use platform::config::NUM_POTS;
use platform::{Indicators, PotReading, TriggerOutput};
use sequencer::{Sequencer, TempoMap};

use crate::pots::Pots;
use crate::shared::SharedClock;
use crate::ui::{Ui, UiCommand, UiMode};

/// Poll-loop state.
#[derive(Debug, Clone)]
pub struct App {
    map: TempoMap,
    sequencer: Sequencer,
    ui: Ui,
    pots: Pots,
}

impl App {
    /// Build the tempo map from the first pot scan.
    pub fn new(initial: [PotReading; NUM_POTS]) -> Self {
        let mut map = TempoMap::new();
        map.recalc(initial);
        Self {
            map,
            sequencer: Sequencer::new(),
            ui: Ui::new(),
            pots: Pots::new(initial),
        }
    }

    /// One millisecond: UI first, so a restart it asks for is queued before
    /// the clock is read, then fire whatever triggers the bar has reached.
    ///
    /// Returns how many triggers reached the output.
    pub fn on_ms<O, L>(
        &mut self,
        clock: &SharedClock,
        button: bool,
        out: &mut O,
        leds: &mut L,
    ) -> usize
    where
        O: TriggerOutput,
        L: Indicators,
    {
        self.pots.on_ms();
        let commands = self.ui.on_ms(button, &mut self.pots, leds);
        for cmd in commands {
            self.apply(clock, cmd);
        }

        let snap = clock.snapshot();
        if matches!(self.ui.mode(), UiMode::Menu(_)) {
            // The menu owns the position bar.
            self.sequencer
                .advance(snap, &self.map, out, &mut ClockLedOnly(leds))
        } else {
            self.sequencer.advance(snap, &self.map, out, leds)
        }
    }

    /// Carry out one UI command.
    pub fn apply(&mut self, clock: &SharedClock, cmd: UiCommand) {
        match cmd {
            UiCommand::SetStepCount(steps) => clock.set_step_count(steps),
            UiCommand::SetTrigCount(trigs) => {
                self.map.set_num_trigs(trigs);
                self.sequencer.resync(&self.map);
            }
            UiCommand::SetResetMode(mode) => {
                clock.set_reset_mode(mode);
                self.sequencer.set_reset_mode(mode);
            }
            UiCommand::SetBpm(bpm) => clock.set_bpm(bpm),
            UiCommand::RecalcPattern(controls) => {
                self.map.recalc(controls);
                self.sequencer.resync(&self.map);
            }
            UiCommand::Restart => clock.request_restart(),
        }
    }

    /// Pot scanner, for the ADC task.
    pub fn pots_mut(&mut self) -> &mut Pots {
        &mut self.pots
    }

    /// Current tempo map.
    pub fn map(&self) -> &TempoMap {
        &self.map
    }

    /// Trigger scheduler.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Button and menu state.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }
}

/// Passes clock blinks through, drops position-bar updates.
struct ClockLedOnly<'a, L>(&'a mut L);

impl<L: Indicators> Indicators for ClockLedOnly<'_, L> {
    fn flash_clock(&mut self, ms: u16) {
        self.0.flash_clock(ms);
    }

    fn show_position(&mut self, _led: u8, _ms: u16) {}

    fn clear_position(&mut self) {}
}
