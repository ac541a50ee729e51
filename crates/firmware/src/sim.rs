//! Host-side model of the board.
//!
//! Wires the same [`SharedClock`], [`App`], [`TriggerOut`] and [`Leds`] the
//! hardware binary uses to recording pins, and steps them one millisecond
//! at a time in the order the tasks run on the target: tick, edges, poll.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use platform::config::NUM_POTS;
use platform::{Edge, PositionLeds, PotReading};
use timebase::TimebaseConfig;

use crate::app::App;
use crate::leds::Leds;
use crate::output::TriggerOut;
use crate::shared::SharedClock;

/// Output pin that counts rising edges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    high: bool,
    rises: usize,
}

impl SimPin {
    /// Current level.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Low-to-high transitions so far.
    pub fn rises(&self) -> usize {
        self.rises
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rises = self.rises.saturating_add(1);
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

/// Position bar that remembers the lit LED.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimBar {
    lit: Option<u8>,
}

impl SimBar {
    /// Currently lit LED.
    pub fn lit(&self) -> Option<u8> {
        self.lit
    }
}

impl PositionLeds for SimBar {
    fn set(&mut self, led: Option<u8>) {
        self.lit = led;
    }
}

/// Jack and panel inputs for one millisecond.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimInput {
    /// Rising edge on the clock jack.
    pub clock: bool,
    /// Edge on the reset jack.
    pub reset: Option<Edge>,
    /// Button level.
    pub button: bool,
}

/// The whole module on the bench.
pub struct Simulator {
    clock: SharedClock,
    app: App,
    out: TriggerOut<SimPin>,
    leds: Leds<SimPin, SimBar>,
    now_ms: u64,
    fired: usize,
}

impl Simulator {
    /// Power up with the pots at `pots`.
    pub fn new(config: TimebaseConfig, pots: [PotReading; NUM_POTS]) -> Self {
        Self {
            clock: SharedClock::new(config),
            app: App::new(pots),
            out: TriggerOut::new(SimPin::default()),
            leds: Leds::new(SimPin::default(), SimBar::default()),
            now_ms: 0,
            fired: 0,
        }
    }

    /// Advance one millisecond. Returns triggers fired by the poll loop.
    pub fn step(&mut self, input: SimInput) -> usize {
        self.clock.on_tick();
        self.out.on_ms();
        self.leds.on_ms();
        if input.clock {
            self.clock.on_external_pulse();
        }
        if let Some(edge) = input.reset {
            self.clock.on_reset_edge(edge);
        }
        let fired = self
            .app
            .on_ms(&self.clock, input.button, &mut self.out, &mut self.leds);
        self.fired = self.fired.saturating_add(fired);
        self.now_ms = self.now_ms.saturating_add(1);
        fired
    }

    /// Run `ms` milliseconds, asking `input` for each one by time.
    pub fn run(&mut self, ms: u64, mut input: impl FnMut(u64) -> SimInput) -> usize {
        let mut fired = 0usize;
        for _ in 0..ms {
            let now = self.now_ms;
            fired = fired.saturating_add(self.step(input(now)));
        }
        fired
    }

    /// Feed one full ADC scan.
    pub fn turn_pots(&mut self, values: [PotReading; NUM_POTS]) {
        for value in values {
            self.app.pots_mut().on_sample(value);
        }
    }

    /// Milliseconds since power-up.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Triggers the sequencer let through so far.
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// Whether the output jack is high.
    pub fn output_high(&self) -> bool {
        self.out.is_high()
    }

    /// Pulses seen on the output jack.
    pub fn output_rises(&self) -> usize {
        self.out.pin().rises()
    }

    /// Whether a pulse is in flight or queued on the jack.
    pub fn output_busy(&self) -> bool {
        self.out.is_busy()
    }

    /// The clock shared with the tick context.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Poll-loop state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Panel LEDs.
    pub fn leds(&self) -> &Leds<SimPin, SimBar> {
        &self.leds
    }
}
