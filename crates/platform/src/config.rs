//! Application configuration and constants
//!
//! Timing values shared by the firmware collaborators. Everything is in
//! milliseconds of the 1 ms tick context unless the name says otherwise.

/// The application name
pub const APP_NAME: &str = "Ticker";

/// The application type/category
pub const APP_TYPE: &str = "Eurorack clock";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full application title (name + type)
pub const fn app_title() -> &'static str {
    APP_NAME
}

// ── LED blink lengths ───────────────────────────────────────────────────────

/// Ordinary step / trigger blink.
pub const BLINK_SHORT_MS: u16 = 10;

/// Every fourth step (beat) and every fourth trigger.
pub const BLINK_MEDIUM_MS: u16 = 50;

/// Bar restart.
pub const BLINK_LONG_MS: u16 = 200;

/// Passing this as a blink length keeps the LED lit until replaced.
pub const BLINK_HOLD: u16 = 0;

// ── Trigger output shaping ──────────────────────────────────────────────────

/// High phase of one trigger pulse.
pub const OUTPUT_PULSE_MS: u8 = 10;

/// Low phase at the end of every pulse so back-to-back triggers stay distinct.
pub const OUTPUT_LOW_MS: u8 = 5;

// ── UI timing ───────────────────────────────────────────────────────────────

/// Button must hold a level this long before the change is accepted.
pub const DEBOUNCE_MS: u16 = 20;

/// Two presses closer than this count as a double click.
pub const DOUBLE_CLICK_MS: u16 = 200;

/// A pot is considered settled after this long without movement.
pub const POT_SETTLE_MS: u16 = 1000;

/// Minimum change in an 8-bit pot reading that counts as movement.
pub const POT_MOVE_TOLERANCE: u8 = 2;

/// Movement window kept by the pot scanner itself.
pub const POT_MOVE_TIMEOUT_MS: u16 = 200;

/// Number of control pots on the panel.
pub const NUM_POTS: usize = 4;

/// Number of LEDs in the position bar.
pub const NUM_POSITION_LEDS: u8 = 4;
