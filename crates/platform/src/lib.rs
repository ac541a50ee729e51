//! Hardware Abstraction Layer (HAL) for the Ticker clock module
//!
//! This crate provides the trait seams between the clock/sequencer core and
//! the board, plus the small domain newtypes the UI hands to the core.
//! Nothing here depends on Embassy or a concrete MCU, so every consumer can
//! be tested on the host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: ISR glue, UI, poll loop)
//!         ↓
//! Core Layers (timebase, sequencer)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Seams
//!
//! - [`TriggerOutput`] - the gate/trigger jack; fired once per scheduled trigger
//! - [`Indicators`] - clock LED flashes and the position LED bar
//! - [`PositionLeds`] - raw four-LED position display, one LED lit at a time
//!
//! # Features
//!
//! - `std`: Export the recording [`mocks`] to other crates' tests
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```
//! use platform::{Indicators, TriggerOutput};
//!
//! fn fire<O: TriggerOutput, L: Indicators>(out: &mut O, leds: &mut L) {
//!     out.trigger();
//!     leds.show_position(0, platform::config::BLINK_SHORT_MS);
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod gpio;
pub mod indicator;
pub mod mocks;
pub mod trigger;
pub mod types;

pub use gpio::{Edge, PinState};
pub use indicator::{Indicators, PositionLeds};
pub use trigger::TriggerOutput;
pub use types::{Bpm, OutOfRangeError, PotReading, StepCount, TrigCount};
