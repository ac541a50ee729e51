//! Mock implementations for testing
//!
//! Recording doubles for the platform traits. They capture every call so a
//! test can assert on exact trigger counts and LED sequences.

#![cfg(any(test, feature = "std"))]

use crate::{Indicators, PositionLeds, TriggerOutput};

/// Calls recorded by [`MockIndicators`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    /// `flash_clock(ms)`
    Clock(u16),
    /// `show_position(led, ms)`
    Position(u8, u16),
    /// `clear_position()`
    Clear,
}

/// Mock trigger output: counts triggers.
#[derive(Debug, Default)]
pub struct MockTrigger {
    count: usize,
}

impl MockTrigger {
    /// Create a new mock with zero triggers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers fired so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Return the count and reset it.
    pub fn take(&mut self) -> usize {
        core::mem::take(&mut self.count)
    }
}

impl TriggerOutput for MockTrigger {
    fn trigger(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

/// Mock indicators: keeps the most recent calls.
#[derive(Debug, Default)]
pub struct MockIndicators {
    log: heapless::Vec<Indication, 512>,
}

impl MockIndicators {
    /// Create a new mock with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, oldest first. Calls past capacity are dropped.
    pub fn log(&self) -> &[Indication] {
        &self.log
    }

    /// Clock flashes only, oldest first.
    pub fn clock_flashes(&self) -> impl Iterator<Item = u16> + '_ {
        self.log.iter().filter_map(|i| match i {
            Indication::Clock(ms) => Some(*ms),
            _ => None,
        })
    }

    /// Position LEDs shown, oldest first.
    pub fn positions(&self) -> impl Iterator<Item = u8> + '_ {
        self.log.iter().filter_map(|i| match i {
            Indication::Position(led, _) => Some(*led),
            _ => None,
        })
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    fn record(&mut self, indication: Indication) {
        let _ = self.log.push(indication);
    }
}

impl Indicators for MockIndicators {
    fn flash_clock(&mut self, ms: u16) {
        self.record(Indication::Clock(ms));
    }

    fn show_position(&mut self, led: u8, ms: u16) {
        self.record(Indication::Position(led, ms));
    }

    fn clear_position(&mut self) {
        self.record(Indication::Clear);
    }
}

/// Mock position bar: remembers which LED is lit.
#[derive(Debug, Default)]
pub struct MockPositionLeds {
    lit: Option<u8>,
    writes: usize,
}

impl MockPositionLeds {
    /// Create a new mock with the bar dark.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently lit LED.
    pub fn lit(&self) -> Option<u8> {
        self.lit
    }

    /// Number of `set` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PositionLeds for MockPositionLeds {
    fn set(&mut self, led: Option<u8>) {
        self.lit = led;
        self.writes = self.writes.saturating_add(1);
    }
}
