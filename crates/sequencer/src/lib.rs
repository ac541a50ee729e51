//! Trigger sequencing for the Ticker module
//!
//! The [`Sequencer`] walks a [`TempoMap`] against the bar position published
//! by the timebase and fires the trigger output once per crossed entry.
//!
//! ```text
//! PulseTimebase ──position + ClockEvents──▶ Sequencer ──▶ TriggerOutput
//!                                              │   ▲
//!                                              ▼   │ trig(i)
//!                                          Indicators  TempoMap ◀── pots
//! ```
//!
//! [`ResetGate`] holds the reset-jack policy ([`ResetMode`]). It lives next
//! to the timebase in the tick context because a reset edge may have to
//! restart the bar before the poll loop runs; the sequencer only sees the
//! resulting `output_enabled` level in each [`ClockSnapshot`].
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` derives and logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod reset;
pub mod sequencer;
pub mod tempo_map;

pub use reset::{ResetGate, ResetMode, ResetModeError};
pub use sequencer::{ClockSnapshot, Sequencer};
pub use tempo_map::{TempoMap, TempoMapError, MAX_TRIGS};
