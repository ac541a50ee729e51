//! Domain newtypes for the clock configuration.
//!
//! The core clamps raw values itself, so these exist for the UI edge:
//! - `Bpm`: 1–999, what the tempo menu produces
//! - `StepCount`: steps per bar, 1–64
//! - `TrigCount`: triggers per bar, 1–32 (tempo map capacity)
//! - `PotReading`: 8-bit pot value with the menu decodings

use thiserror_no_std::Error;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

fn check_range(value: u32, min: u32, max: u32) -> Result<(), OutOfRangeError> {
    if value < min || value > max {
        Err(OutOfRangeError { value, min, max })
    } else {
        Ok(())
    }
}

// ── Bpm ──────────────────────────────────────────────────────────────────────

/// Internal tempo in beats (steps) per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Bpm(u16);

impl Bpm {
    /// Slowest accepted tempo.
    pub const MIN: u16 = 1;
    /// Fastest accepted tempo.
    pub const MAX: u16 = 999;
    /// Power-on tempo.
    pub const DEFAULT: Self = Self(120);

    /// Create a `Bpm`, clamping into `MIN..=MAX`.
    #[must_use]
    pub fn new(value: u16) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Create a `Bpm`, rejecting values outside `MIN..=MAX`.
    pub fn try_new(value: u16) -> Result<Self, OutOfRangeError> {
        check_range(value.into(), Self::MIN.into(), Self::MAX.into())?;
        Ok(Self(value))
    }

    /// Tempo chosen by the BPM menu: `15 + 2 * reading` (15–525).
    #[must_use]
    pub fn from_pot(reading: PotReading) -> Self {
        let doubled = u16::from(reading.get()).saturating_mul(2);
        Self::new(doubled.saturating_add(15))
    }

    /// Return the tempo.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── StepCount ────────────────────────────────────────────────────────────────

/// Number of clock steps per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct StepCount(u8);

impl StepCount {
    /// Fewest steps per bar.
    pub const MIN: u8 = 1;
    /// Most steps per bar.
    pub const MAX: u8 = 64;
    /// Power-on step count.
    pub const DEFAULT: Self = Self(16);
    /// Values offered by the step-count menu, indexed by option.
    pub const MENU: [u8; 4] = [4, 8, 16, 32];

    /// Create a `StepCount`, clamping into `MIN..=MAX`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Create a `StepCount`, rejecting values outside `MIN..=MAX`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        check_range(value.into(), Self::MIN.into(), Self::MAX.into())?;
        Ok(Self(value))
    }

    /// Menu entry `option` (0–3).
    pub fn from_menu(option: u8) -> Result<Self, OutOfRangeError> {
        Self::MENU
            .get(usize::from(option))
            .map(|&n| Self(n))
            .ok_or(OutOfRangeError {
                value: option.into(),
                min: 0,
                max: 3,
            })
    }

    /// Return the step count.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for StepCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── TrigCount ────────────────────────────────────────────────────────────────

/// Number of triggers in the tempo map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct TrigCount(u8);

impl TrigCount {
    /// Fewest triggers per bar.
    pub const MIN: u8 = 1;
    /// Tempo map capacity.
    pub const MAX: u8 = 32;
    /// Power-on trigger count.
    pub const DEFAULT: Self = Self(16);
    /// Values offered by the trigger-count menu, indexed by option.
    pub const MENU: [u8; 4] = [4, 8, 16, 32];

    /// Create a `TrigCount`, clamping into `MIN..=MAX`.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Create a `TrigCount`, rejecting values outside `MIN..=MAX`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        check_range(value.into(), Self::MIN.into(), Self::MAX.into())?;
        Ok(Self(value))
    }

    /// Menu entry `option` (0–3).
    pub fn from_menu(option: u8) -> Result<Self, OutOfRangeError> {
        Self::MENU
            .get(usize::from(option))
            .map(|&n| Self(n))
            .ok_or(OutOfRangeError {
                value: option.into(),
                min: 0,
                max: 3,
            })
    }

    /// Return the trigger count.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for TrigCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── PotReading ───────────────────────────────────────────────────────────────

/// 8-bit potentiometer reading (ADC result shifted down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PotReading(u8);

impl PotReading {
    /// Mid-travel, the neutral setting for the tempo map.
    pub const CENTER: Self = Self(128);

    /// Wrap a raw reading.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Reduce a 12-bit ADC sample to a reading.
    #[must_use]
    pub fn from_adc12(sample: u16) -> Self {
        #[allow(clippy::cast_possible_truncation)] // 12-bit / 16 fits in u8
        Self((sample.min(0x0FFF) / 16) as u8)
    }

    /// Four-way menu option selected by this reading (`reading / 64`).
    #[must_use]
    pub fn menu_option(self) -> u8 {
        self.0 / 64
    }

    /// Return the raw reading.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for PotReading {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
