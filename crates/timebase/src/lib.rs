//! Bar-position clock engine for the Ticker module
//!
//! [`PulseTimebase`] turns two time sources into one position within a bar:
//!
//! - a free-running internal tempo, advanced by a 1 ms tick, and
//! - an external clock pulse train, with the 1 ms tick interpolating between
//!   pulses at the last measured rate.
//!
//! # Position space
//!
//! One bar is [`TICKS_PER_BAR`] (2^32) ticks regardless of how many steps it
//! is divided into, so the step count can change mid-bar without moving the
//! playhead. [`PulseTimebase::position`] exposes the top 16 bits.
//!
//! ```text
//!  0                 ticks_per_step        2·ticks_per_step          2^32
//!  |-------- step 0 --------|-------- step 1 --------|  ...  | last step |
//!                           ^ ticks_at_next_step (external mode clamp)
//! ```
//!
//! # Contexts
//!
//! Every `on_*` method belongs to the tick context (timer interrupt and edge
//! interrupts, which never preempt each other). The poll context reads
//! [`position`](PulseTimebase::position) and consumes [`ClockEvents`] with
//! [`take_events`](PulseTimebase::take_events). The firmware wraps the engine
//! in a critical-section mutex so that read-and-clear is atomic.
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` derives and mode-change logging
//!
//! # Example
//!
//! ```
//! use timebase::{ClockEvents, PulseTimebase, TimebaseConfig};
//!
//! let mut clock = PulseTimebase::new(TimebaseConfig::default());
//! clock.init(120, 16);
//! for _ in 0..500 {
//!     clock.on_tick();
//! }
//! // 500 ms at 120 BPM is exactly one step of sixteen.
//! assert_eq!(clock.current_step(), 1);
//! assert!(clock.take_events().contains(ClockEvents::STEP));
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod events;
pub mod timebase;

pub use config::TimebaseConfig;
pub use events::ClockEvents;
pub use timebase::{ClockSource, PulseTimebase, SyncWindow, TICKS_PER_BAR};
