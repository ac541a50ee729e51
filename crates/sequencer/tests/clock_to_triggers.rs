//! Timebase → sequencer integration: the poll loop reading a real clock.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use platform::mocks::{Indication, MockIndicators, MockTrigger};
use platform::{Edge, TrigCount};
use sequencer::{ClockSnapshot, ResetGate, ResetMode, Sequencer, TempoMap};
use timebase::{ClockEvents, PulseTimebase, TimebaseConfig};

struct Rig {
    clock: PulseTimebase,
    gate: ResetGate,
    seq: Sequencer,
    map: TempoMap,
    out: MockTrigger,
    leds: MockIndicators,
}

impl Rig {
    fn new(trigs: u8) -> Self {
        let mut clock = PulseTimebase::new(TimebaseConfig::DEFAULT);
        clock.init(120, 16);
        Self {
            clock,
            gate: ResetGate::new(),
            seq: Sequencer::new(),
            map: TempoMap::uniform(TrigCount::new(trigs)),
            out: MockTrigger::new(),
            leds: MockIndicators::new(),
        }
    }

    fn poll(&mut self) -> usize {
        let snap = ClockSnapshot {
            position: self.clock.position(),
            events: self.clock.take_events(),
            output_enabled: self.gate.output_enabled(),
        };
        self.seq.advance(snap, &self.map, &mut self.out, &mut self.leds)
    }

    fn run(&mut self, ms: u32) {
        for _ in 0..ms {
            self.clock.on_tick();
            self.poll();
        }
    }

    fn reset_edge(&mut self, edge: Edge) {
        if self.gate.on_edge(edge) {
            self.clock.on_external_reset();
        }
    }
}

/// One 8 s bar at 120 BPM fires sixteen triggers, then the next bar starts.
#[test]
fn internal_bar_fires_every_trigger_once() {
    let mut rig = Rig::new(16);
    rig.poll();
    rig.run(7_999);
    assert_eq!(rig.out.take(), 16);
    rig.run(1);
    assert_eq!(rig.out.take(), 1, "trigger 0 of the second bar");
}

/// Polling slower than the clock still fires every trigger, in order.
#[test]
fn sparse_polling_catches_up_in_order() {
    let mut rig = Rig::new(32);
    let mut fired = 0;
    for _ in 0..80 {
        for _ in 0..100 {
            rig.clock.on_tick();
        }
        fired += rig.poll();
    }
    // 8000 ms: one full bar plus trigger 0 of the next.
    assert_eq!(fired, 33);
}

/// An external clock drives the triggers step by step.
#[test]
fn external_clock_paces_triggers() {
    let mut rig = Rig::new(16);
    rig.clock.on_external_pulse();
    rig.poll();
    assert_eq!(rig.out.take(), 1);
    for _ in 0..15 {
        rig.run(25);
        rig.clock.on_external_pulse();
        rig.poll();
    }
    assert_eq!(rig.out.take(), 15);
    // Interpolation between pulses never fires the next step's trigger early.
    rig.run(1_000);
    assert_eq!(rig.out.take(), 0);
    rig.clock.on_external_pulse();
    rig.poll();
    assert_eq!(rig.out.take(), 1, "bar wrapped on the clock jack");
}

/// A reset edge in restart mode drops the rest of the bar.
#[test]
fn reset_jack_restarts_bar() {
    let mut rig = Rig::new(16);
    rig.poll();
    rig.run(2_000);
    assert_eq!(rig.out.take(), 5);
    rig.reset_edge(Edge::Rising);
    rig.run(1);
    assert_eq!(rig.out.take(), 1, "restart fires trigger 0 only");
    assert!(rig.leds.log().contains(&Indication::Clock(200)));
}

/// Run mode mutes while the jack is low and resumes without a burst.
#[test]
fn run_mode_gates_output() {
    let mut rig = Rig::new(16);
    rig.gate.set_mode(ResetMode::Run);
    rig.seq.set_reset_mode(ResetMode::Run);
    rig.poll();
    rig.out.take();
    rig.reset_edge(Edge::Falling);
    rig.run(3_000);
    assert_eq!(rig.out.take(), 0);
    rig.reset_edge(Edge::Rising);
    assert!(!rig.clock.pending_restart(), "run mode never restarts");
    rig.run(600);
    assert_eq!(rig.out.take(), 1);
}

/// A restart event is seen exactly once even if the poll is late.
#[test]
fn restart_event_delivered_once() {
    let mut rig = Rig::new(4);
    rig.clock.request_restart();
    rig.clock.on_tick();
    rig.clock.on_tick();
    assert!(rig.clock.take_events().contains(ClockEvents::RESTART));
    assert!(!rig.clock.take_events().contains(ClockEvents::RESTART));
}
