//! Ticker firmware
//!
//! Eurorack clock and trigger sequencer for STM32G4.
//!
//! # Architecture
//!
//! ```text
//! tick (1 ms) ─┐                 ┌─ TriggerOut::on_ms, Leds::on_ms
//! clock edge ──┼─▶ SharedClock ──┤
//! reset edge ──┘   (timebase +   └─▶ snapshot ─▶ App (poll loop)
//!                   reset gate)                   ├─ Ui + Pots ─▶ UiCommand
//!                                                 └─ Sequencer ─▶ TriggerOut
//! ```
//!
//! The timebase and reset gate only change inside the tick and edge
//! handlers or through [`shared::SharedClock`]. The poll loop reads one
//! atomic [`sequencer::ClockSnapshot`] per millisecond.
//!
//! # Features
//!
//! - `hardware` - Build for the STM32G431 target (embassy, defmt-rtt)
//! - `emulator` - Host simulation with `tracing` output
//! - `std` - Enable standard library and the platform mocks
//! - `defmt` - `defmt::Format` derives and logging
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example clock_sim --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

pub mod app;
pub mod leds;
pub mod output;
pub mod pots;
pub mod shared;
pub mod sim;
pub mod ui;

pub use app::App;
pub use leds::{Leds, PinBar};
pub use output::TriggerOut;
pub use pots::Pots;
pub use shared::{ClockCore, IsrCell, SharedClock};
pub use ui::{Menu, MenuError, Ui, UiCommand, UiMode};
