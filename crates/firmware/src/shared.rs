//! State shared between the tick context and the poll loop.
//!
//! On hardware the 1 ms tick, the clock/reset edge handlers and the poll
//! loop are separate tasks. Everything they share lives in an [`IsrCell`]:
//! a blocking mutex over a `RefCell`, taken inside a critical section for
//! the duration of one closure. Nothing is held across an `.await`.
//!
//! | Field                   | Written by                 | Read by    |
//! |-------------------------|----------------------------|------------|
//! | timebase ticks, events  | tick, clock edge           | poll loop  |
//! | pending restart         | reset edge, poll loop (UI) | tick, edge |
//! | bpm, step count         | poll loop (UI)             | tick, edge |
//! | reset gate              | reset edge, poll loop (UI) | poll loop  |
//! | trigger output pending  | poll loop                  | tick       |

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::{Bpm, Edge, Indicators, StepCount, TriggerOutput};
use sequencer::{ClockSnapshot, ResetGate, ResetMode};
use timebase::{ClockSource, PulseTimebase, TimebaseConfig};

/// A value shared with interrupt-priority code.
pub struct IsrCell<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<T>>,
}

impl<T> IsrCell<T> {
    /// Wrap `value`. `const` so cells can be plain `static`s.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access, inside a critical section.
    ///
    /// `f` must not lock the same cell again.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<T: TriggerOutput> TriggerOutput for &IsrCell<T> {
    fn trigger(&mut self) {
        self.lock(TriggerOutput::trigger);
    }
}

impl<T: Indicators> Indicators for &IsrCell<T> {
    fn flash_clock(&mut self, ms: u16) {
        self.lock(|leds| leds.flash_clock(ms));
    }

    fn show_position(&mut self, led: u8, ms: u16) {
        self.lock(|leds| leds.show_position(led, ms));
    }

    fn clear_position(&mut self) {
        self.lock(Indicators::clear_position);
    }
}

/// The timebase and the reset-jack gate, updated together so a reset edge
/// sees the same clock state the gate decision was made against.
#[derive(Debug, Clone)]
pub struct ClockCore {
    /// Bar position engine.
    pub timebase: PulseTimebase,
    /// Reset-jack policy.
    pub gate: ResetGate,
}

/// The clock as seen from every context.
pub struct SharedClock {
    core: IsrCell<ClockCore>,
}

impl SharedClock {
    /// Internal clock at the configured defaults, `Restart` reset mode.
    pub const fn new(config: TimebaseConfig) -> Self {
        Self {
            core: IsrCell::new(ClockCore {
                timebase: PulseTimebase::new(config),
                gate: ResetGate::new(),
            }),
        }
    }

    /// Start over at `bpm` with `steps` per bar.
    pub fn init(&self, bpm: Bpm, steps: StepCount) {
        self.core.lock(|c| c.timebase.init(bpm.get(), steps.get()));
    }

    // ── Tick / edge contexts ────────────────────────────────────────────────

    /// 1 ms tick.
    pub fn on_tick(&self) {
        self.core.lock(|c| c.timebase.on_tick());
    }

    /// Rising edge on the clock jack.
    pub fn on_external_pulse(&self) {
        self.core.lock(|c| c.timebase.on_external_pulse());
    }

    /// Debounced edge on the reset jack. The gate decides whether it
    /// restarts the bar.
    pub fn on_reset_edge(&self, edge: Edge) {
        self.core.lock(|c| {
            if c.gate.on_edge(edge) {
                c.timebase.on_external_reset();
            }
        });
    }

    // ── Poll loop ───────────────────────────────────────────────────────────

    /// Position, events and output gate, read atomically. Events are
    /// consumed.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.core.lock(|c| ClockSnapshot {
            position: c.timebase.position(),
            events: c.timebase.take_events(),
            output_enabled: c.gate.output_enabled(),
        })
    }

    /// Queue a restart for the next tick (internal) or clock edge
    /// (external).
    pub fn request_restart(&self) {
        self.core.lock(|c| c.timebase.request_restart());
    }

    /// Set the internal tempo. Hands the clock back from the jack.
    pub fn set_bpm(&self, bpm: Bpm) {
        self.core.lock(|c| c.timebase.set_bpm(bpm.get()));
    }

    /// Set the number of steps per bar.
    pub fn set_step_count(&self, steps: StepCount) {
        self.core.lock(|c| c.timebase.set_step_count(steps.get()));
    }

    /// Change how the reset jack is interpreted.
    pub fn set_reset_mode(&self, mode: ResetMode) {
        self.core.lock(|c| c.gate.set_mode(mode));
    }

    /// Which clock drives the bar.
    pub fn source(&self) -> ClockSource {
        self.core.lock(|c| c.timebase.source())
    }

    /// Run `f` against a copy-free view of the core, for status and tests.
    pub fn inspect<R>(&self, f: impl FnOnce(&ClockCore) -> R) -> R {
        self.core.lock(|c| f(c))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{MockIndicators, MockTrigger};
    use timebase::ClockEvents;

    #[test]
    fn snapshot_consumes_events() {
        let clock = SharedClock::new(TimebaseConfig::DEFAULT);
        clock.request_restart();
        clock.on_tick();
        let first = clock.snapshot();
        assert!(first.events.contains(ClockEvents::RESTART));
        assert_eq!(first.position, 0);
        assert!(first.output_enabled);
        assert!(clock.snapshot().events.is_empty());
    }

    #[test]
    fn reset_edge_follows_gate_policy() {
        let clock = SharedClock::new(TimebaseConfig::DEFAULT);
        clock.set_reset_mode(ResetMode::Run);
        clock.on_reset_edge(Edge::Falling);
        assert!(!clock.snapshot().output_enabled);
        clock.on_reset_edge(Edge::Rising);
        assert!(clock.snapshot().output_enabled);
        assert!(
            !clock.inspect(|c| c.timebase.pending_restart()),
            "run mode never restarts"
        );

        clock.set_reset_mode(ResetMode::Restart);
        clock.on_reset_edge(Edge::Falling);
        clock.on_reset_edge(Edge::Rising);
        assert!(clock.inspect(|c| c.timebase.pending_restart()));
    }

    #[test]
    fn reset_inside_leading_window_restarts_at_once() {
        let clock = SharedClock::new(TimebaseConfig::DEFAULT);
        clock.on_external_pulse();
        clock.on_external_pulse();
        clock.snapshot();
        clock.on_reset_edge(Edge::Falling);
        clock.on_reset_edge(Edge::Rising);
        let snap = clock.snapshot();
        assert!(snap.events.contains(ClockEvents::RESTART));
        assert_eq!(snap.position, 0);
    }

    #[test]
    fn bpm_hands_clock_back() {
        let clock = SharedClock::new(TimebaseConfig::DEFAULT);
        clock.on_external_pulse();
        assert_eq!(clock.source(), ClockSource::External);
        clock.set_bpm(Bpm::new(90));
        assert_eq!(clock.source(), ClockSource::Internal);
        assert_eq!(clock.inspect(|c| c.timebase.bpm()), 90);
    }

    #[test]
    fn cells_forward_collaborator_traits() {
        let out = IsrCell::new(MockTrigger::new());
        let leds = IsrCell::new(MockIndicators::new());
        let mut out_ref = &out;
        let mut leds_ref = &leds;
        out_ref.trigger();
        out_ref.trigger();
        leds_ref.flash_clock(10);
        leds_ref.clear_position();
        assert_eq!(out.lock(|t| t.count()), 2);
        assert_eq!(leds.lock(|l| l.log().len()), 2);
    }
}
