//! Ticker bench simulation
//!
//! Runs the firmware core against a virtual clock: two bars on the internal
//! clock, then a patched 100 ms clock with a reset halfway through.
//!
//! Run with: cargo run --example clock_sim --features emulator
//! Filter with: RUST_LOG=clock_sim=debug

use firmware::sim::{SimInput, Simulator};
use platform::config;
use platform::{Edge, PotReading};
use timebase::TimebaseConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("{} - {} bench simulation", config::app_title(), config::APP_TYPE);

    let mut sim = Simulator::new(TimebaseConfig::DEFAULT, [PotReading::CENTER; 4]);

    // Internal clock: 120 bpm, 16 steps, 16 triggers, so one bar is 8 s.
    let fired = sim.run(16_000, |_| SimInput::default());
    info!(ms = sim.now_ms(), fired, "internal clock, two bars");

    // External clock every 100 ms; reset rising 2 ms after the edge at 2 s.
    let start = sim.now_ms();
    let fired = sim.run(4_000, |now| {
        let t = now.saturating_sub(start);
        SimInput {
            clock: t % 100 == 0,
            reset: match t {
                2_001 => Some(Edge::Falling),
                2_002 => Some(Edge::Rising),
                _ => None,
            },
            button: false,
        }
    });
    let (source, position) = sim
        .clock()
        .inspect(|c| (c.timebase.source(), c.timebase.position()));
    info!(ms = sim.now_ms(), fired, ?source, position, "external clock");

    // Reshape the bar: first quarter slow, last quarter fast.
    sim.turn_pots([0, 128, 128, 255].map(PotReading::new));
    sim.run(1_100, |_| SimInput::default());
    let positions = sim.app().map().positions();
    debug!(?positions, "tempo map");
    info!(
        first = positions.first().copied(),
        second = positions.get(1).copied(),
        "pattern recalculated"
    );

    info!(total = sim.fired(), "done");
}
