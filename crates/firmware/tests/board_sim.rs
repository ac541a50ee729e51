//! Whole-board behaviour on the bench model: jacks, panel and output.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use firmware::sim::{SimInput, Simulator};
use firmware::UiMode;
use platform::config::{NUM_POTS, POT_SETTLE_MS};
use platform::{Edge, PotReading};
use sequencer::ResetMode;
use timebase::{ClockSource, TimebaseConfig};

fn centred() -> [PotReading; NUM_POTS] {
    [PotReading::CENTER; NUM_POTS]
}

fn idle(_: u64) -> SimInput {
    SimInput::default()
}

fn held(_: u64) -> SimInput {
    SimInput {
        button: true,
        ..SimInput::default()
    }
}

/// Clock edge every `period` ms, counted from `start`.
fn clocked(start: u64, period: u64) -> impl Fn(u64) -> SimInput {
    move |now| SimInput {
        clock: (now - start) % period == 0,
        ..SimInput::default()
    }
}

#[test]
fn internal_clock_plays_one_bar_in_eight_seconds() {
    // 120 bpm, 16 steps, 16 evenly spaced triggers.
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    assert_eq!(sim.run(7_999, idle), 16);
    assert_eq!(sim.output_rises(), 16);
    assert_eq!(sim.run(1, idle), 1, "trigger 0 of the next bar");
}

#[test]
fn external_clock_fires_one_trigger_per_edge() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    let start = sim.now_ms();
    let clock = clocked(start, 100);
    for _ in 0..1_600 {
        let now = sim.now_ms();
        let input = clock(now);
        let fired = sim.step(input);
        if input.clock {
            assert_eq!(fired, 1, "edge at {now} ms");
        } else {
            assert_eq!(fired, 0, "between edges at {now} ms");
        }
    }
    assert_eq!(sim.fired(), 16);
    assert_eq!(sim.clock().source(), ClockSource::External);
}

#[test]
fn reset_just_after_edge_restarts_at_once() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    let start = sim.now_ms();
    sim.run(1_002, clocked(start, 100));
    sim.step(SimInput {
        reset: Some(Edge::Falling),
        ..SimInput::default()
    });
    let fired = sim.step(SimInput {
        reset: Some(Edge::Rising),
        ..SimInput::default()
    });
    assert_eq!(fired, 1, "trigger 0 replays immediately");
    assert_eq!(sim.clock().inspect(|c| c.timebase.position()), 0);
}

#[test]
fn late_reset_waits_for_next_edge() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    let start = sim.now_ms();
    sim.run(1_050, clocked(start, 100));
    sim.step(SimInput {
        reset: Some(Edge::Falling),
        ..SimInput::default()
    });
    assert_eq!(
        sim.step(SimInput {
            reset: Some(Edge::Rising),
            ..SimInput::default()
        }),
        0
    );
    assert!(sim.clock().inspect(|c| c.timebase.pending_restart()));

    // Next edge lands at 1 100 ms.
    sim.run(48, idle);
    let fired = sim.step(SimInput {
        clock: true,
        ..SimInput::default()
    });
    assert_eq!(fired, 1);
    assert_eq!(sim.app().sequencer().cursor(), 1, "bar starts over");
}

#[test]
fn run_mode_from_menu_gates_output() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    sim.run(30, held);
    // Pot 2 (reset menu) to option 2: run.
    sim.turn_pots([128, 128, 160, 128].map(PotReading::new));
    sim.run(u64::from(POT_SETTLE_MS) + 1, held);
    assert_eq!(sim.app().sequencer().reset_mode(), ResetMode::Run);
    sim.run(30, idle);
    assert_eq!(sim.app().ui().mode(), UiMode::Pattern);

    sim.step(SimInput {
        reset: Some(Edge::Falling),
        ..SimInput::default()
    });
    assert_eq!(sim.run(4_000, idle), 0, "muted while the gate is low");

    sim.step(SimInput {
        reset: Some(Edge::Rising),
        ..SimInput::default()
    });
    assert!(
        !sim.clock().inspect(|c| c.timebase.pending_restart()),
        "run mode does not restart"
    );
    assert!(sim.run(4_000, idle) > 0);
}

#[test]
fn tempo_menu_sets_internal_bpm() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    sim.run(30, held);
    sim.turn_pots([128, 128, 128, 0].map(PotReading::new));
    sim.run(u64::from(POT_SETTLE_MS) + 1, held);
    assert_eq!(sim.clock().inspect(|c| c.timebase.bpm()), 15);
}

#[test]
fn double_click_restarts_the_bar() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    sim.run(3_000, idle);
    sim.run(30, held);
    sim.run(30, idle);
    sim.run(1, held);
    // Restart is queued by the UI and taken on the next tick.
    assert_eq!(sim.run(1, held), 1);
    assert_eq!(sim.app().sequencer().cursor(), 1);
}

#[test]
fn pattern_pots_reshape_the_bar() {
    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, centred());
    let even = sim.app().map().positions().to_vec();
    sim.turn_pots([0, 128, 128, 255].map(PotReading::new));
    sim.run(u64::from(POT_SETTLE_MS) + 1, idle);
    let shaped = sim.app().map().positions().to_vec();
    assert_eq!(shaped.len(), even.len());
    assert_ne!(shaped, even);
    assert_eq!(shaped[0], 0);
}
