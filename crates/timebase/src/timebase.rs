//! The clock engine.
//!
//! # State machine
//!
//! ```text
//!                  first on_external_pulse()            set_bpm()
//!   [Internal] ───────────────────────────────▶ [External] ─────────▶ [Internal]
//!    tick advances by ticks_per_ms,              tick interpolates up to
//!    wraps at the end of the bar                 ticks_at_next_step − 1,
//!                                                pulses move the window
//! ```
//!
//! Orthogonal to the source, every clock edge opens a short
//! [`SyncWindow::LeadingClock`] window. A reset edge inside it is treated as
//! coincident with that clock edge and restarts the bar immediately; outside
//! it the restart is queued for the next clock edge (or the next tick, in
//! internal mode).

use crate::config::TimebaseConfig;
use crate::events::ClockEvents;

/// One full bar in ticks.
pub const TICKS_PER_BAR: u64 = 1 << 32;

/// Ticks represented by one unit of [`PulseTimebase::position`].
const TICKS_PER_POSITION: u64 = 1 << 16;

/// Mask for wrapping tick counts into a bar.
const BAR_MASK: u64 = TICKS_PER_BAR - 1;

const MS_PER_MINUTE: u64 = 60_000;

/// Where the position is paced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Free-running from the BPM setting.
    Internal,
    /// Slaved to pulses on the clock jack.
    External,
}

/// Clock/reset coincidence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncWindow {
    /// A reset edge now will be queued.
    Normal,
    /// A clock edge was just taken; a reset edge now restarts immediately.
    LeadingClock,
}

/// Bar-position engine driven by a 1 ms tick and external clock/reset edges.
///
/// Invariants:
/// - `ticks < TICKS_PER_BAR`
/// - `ticks_per_step >= 1` and `ticks_per_ms >= 1`
/// - in external mode, `ticks < ticks_at_next_step <= TICKS_PER_BAR`
#[derive(Debug, Clone)]
pub struct PulseTimebase {
    config: TimebaseConfig,
    bpm: u16,
    steps: u8,
    ticks: u64,
    ticks_per_step: u64,
    ticks_per_ms: u64,
    ticks_at_next_step: u64,
    source: ClockSource,
    pending_restart: bool,
    ms_since_pulse: u32,
    leading_clock_timeout_ms: u8,
    /// Last accepted external pulse interval, kept so a step-count change
    /// can rescale the interpolation rate.
    ext_period_ms: Option<u32>,
    events: ClockEvents,
}

const fn derive_ticks_per_step(steps: u8) -> u64 {
    match TICKS_PER_BAR.checked_div(steps as u64) {
        Some(tps) if tps > 0 => tps,
        _ => TICKS_PER_BAR,
    }
}

/// `round(ticks_per_step / (60000 / bpm))`, never zero.
const fn derive_ticks_per_ms(ticks_per_step: u64, bpm: u16) -> u64 {
    let scaled = ticks_per_step
        .saturating_mul(bpm as u64)
        .saturating_add(MS_PER_MINUTE / 2);
    match scaled.checked_div(MS_PER_MINUTE) {
        Some(tpm) if tpm > 0 => tpm,
        _ => 1,
    }
}

/// End of the step window that starts at `start`. The last step of the bar
/// runs to `TICKS_PER_BAR` so it absorbs the truncation slack.
fn window_end(start: u64, ticks_per_step: u64) -> u64 {
    let end = start.saturating_add(ticks_per_step);
    if end.saturating_add(ticks_per_step) > TICKS_PER_BAR {
        TICKS_PER_BAR
    } else {
        end
    }
}

impl PulseTimebase {
    /// Create an engine at the configured default tempo and step count,
    /// internal clock, position zero.
    pub const fn new(config: TimebaseConfig) -> Self {
        let bpm = if config.default_bpm == 0 { 1 } else { config.default_bpm };
        let steps = if config.default_steps == 0 { 1 } else { config.default_steps };
        let ticks_per_step = derive_ticks_per_step(steps);
        Self {
            config,
            bpm,
            steps,
            ticks: 0,
            ticks_per_step,
            ticks_per_ms: derive_ticks_per_ms(ticks_per_step, bpm),
            ticks_at_next_step: ticks_per_step,
            source: ClockSource::Internal,
            pending_restart: false,
            ms_since_pulse: 0,
            leading_clock_timeout_ms: 0,
            ext_period_ms: None,
            events: ClockEvents::NONE,
        }
    }

    /// Reset all state and start over at `bpm` with `steps` per bar.
    ///
    /// Zero values are clamped to one, oversized step counts to
    /// `max_steps`. The configuration is kept.
    pub fn init(&mut self, bpm: u16, steps: u8) {
        *self = Self::new(self.config);
        self.bpm = bpm.max(1);
        self.set_step_count(steps);
    }

    // ── Tick context ─────────────────────────────────────────────────────────

    /// Advance by one millisecond.
    ///
    /// A restart pending in internal mode is applied here instead of the
    /// advance. In external mode the interpolation stops one tick short of
    /// the next step window so it never runs ahead of the clock jack.
    pub fn on_tick(&mut self) {
        if self.pending_restart && self.source == ClockSource::Internal {
            self.apply_restart();
        } else {
            match self.source {
                ClockSource::Internal => self.advance_free_running(),
                ClockSource::External => self.advance_interpolated(),
            }
        }
        self.leading_clock_timeout_ms = self.leading_clock_timeout_ms.saturating_sub(1);
        self.ms_since_pulse = self.ms_since_pulse.saturating_add(1);
    }

    /// Rising edge on the clock jack.
    pub fn on_external_pulse(&mut self) {
        match self.source {
            ClockSource::Internal => {
                // Handoff: the clock jack is now authoritative and the bar
                // restarts at its first edge. The interval since whatever
                // came before says nothing about its tempo.
                self.source = ClockSource::External;
                self.apply_restart();
                #[cfg(feature = "defmt")]
                defmt::info!("timebase: external clock, {=u8} steps", self.steps);
            }
            ClockSource::External => {
                if self.pending_restart {
                    self.apply_restart();
                } else {
                    self.advance_step_window();
                }
                self.estimate_rate();
            }
        }
        self.ms_since_pulse = 0;
        self.leading_clock_timeout_ms = self.config.leading_clock_window_ms;
    }

    /// Rising edge on the reset jack (after reset-mode gating).
    ///
    /// Inside the leading-clock window the restart overrides the step the
    /// clock edge just took. Otherwise it waits for the next clock edge.
    pub fn on_external_reset(&mut self) {
        if self.leading_clock_timeout_ms > 0 {
            self.apply_restart();
        } else {
            self.pending_restart = true;
        }
    }

    /// Software restart (double click, menu exit). Always queued; repeated
    /// requests before it is applied collapse into one.
    pub fn request_restart(&mut self) {
        self.pending_restart = true;
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Set the internal tempo and return to the internal clock.
    ///
    /// The position is kept, so the handback has no phase jump.
    pub fn set_bpm(&mut self, bpm: u16) {
        self.bpm = bpm.max(1);
        if self.source == ClockSource::External {
            #[cfg(feature = "defmt")]
            defmt::info!("timebase: internal clock, {=u16} bpm", self.bpm);
        }
        self.source = ClockSource::Internal;
        self.ext_period_ms = None;
        self.ticks_per_ms = derive_ticks_per_ms(self.ticks_per_step, self.bpm);
    }

    /// Change the number of steps per bar, clamped to `1..=max_steps`.
    ///
    /// The position is kept. In external mode the step window is re-derived
    /// around the current position and the interpolation rate rescaled to
    /// the last measured pulse interval.
    pub fn set_step_count(&mut self, steps: u8) {
        self.steps = steps.clamp(1, self.config.max_steps.max(1));
        self.ticks_per_step = derive_ticks_per_step(self.steps);
        self.ticks_per_ms = match (self.source, self.ext_period_ms) {
            (ClockSource::External, Some(period)) => self.rate_for_period(period),
            _ => derive_ticks_per_ms(self.ticks_per_step, self.bpm),
        };
        if self.source == ClockSource::External {
            let start = self.step_start(self.ticks);
            self.ticks_at_next_step = window_end(start, self.ticks_per_step);
        } else {
            self.ticks_at_next_step = window_end(0, self.ticks_per_step);
        }
    }

    // ── Poll context accessors ───────────────────────────────────────────────

    /// Position within the bar, 0–65535.
    pub fn position(&self) -> u16 {
        u16::try_from(self.ticks / TICKS_PER_POSITION).unwrap_or(u16::MAX)
    }

    /// Take and clear every pending event.
    pub fn take_events(&mut self) -> ClockEvents {
        core::mem::take(&mut self.events)
    }

    /// Take and clear the restart flag only.
    pub fn take_restart(&mut self) -> bool {
        self.events.remove(ClockEvents::RESTART)
    }

    /// Take and clear the step flag (and its beat qualifier) only.
    pub fn take_step(&mut self) -> bool {
        let step = self.events.remove(ClockEvents::STEP);
        self.events.remove(ClockEvents::BEAT);
        step
    }

    /// Events raised since the last take, without clearing them.
    pub fn peek_events(&self) -> ClockEvents {
        self.events
    }

    /// Index of the step the position is in, `0..step_count()`.
    pub fn current_step(&self) -> u8 {
        let index = self.ticks.checked_div(self.ticks_per_step).unwrap_or(0);
        let last = self.steps.saturating_sub(1);
        u8::try_from(index).map_or(last, |i| i.min(last))
    }

    /// Raw tick position, `0..TICKS_PER_BAR`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current clock source.
    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// Whether the clock jack is driving the position.
    pub fn is_external(&self) -> bool {
        self.source == ClockSource::External
    }

    /// Clock/reset coincidence state.
    pub fn sync_window(&self) -> SyncWindow {
        if self.leading_clock_timeout_ms > 0 {
            SyncWindow::LeadingClock
        } else {
            SyncWindow::Normal
        }
    }

    /// Whether a restart is queued.
    pub fn pending_restart(&self) -> bool {
        self.pending_restart
    }

    /// Width of one step in ticks.
    pub fn ticks_per_step(&self) -> u64 {
        self.ticks_per_step
    }

    /// Interpolation rate in ticks per millisecond.
    pub fn ticks_per_ms(&self) -> u64 {
        self.ticks_per_ms
    }

    /// Upper bound of the current step window (external mode).
    pub fn ticks_at_next_step(&self) -> u64 {
        self.ticks_at_next_step
    }

    /// Internal tempo setting.
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    /// Steps per bar.
    pub fn step_count(&self) -> u8 {
        self.steps
    }

    /// Milliseconds since the last clock edge (saturating).
    pub fn ms_since_pulse(&self) -> u32 {
        self.ms_since_pulse
    }

    /// Active configuration.
    pub fn config(&self) -> &TimebaseConfig {
        &self.config
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn apply_restart(&mut self) {
        self.ticks = 0;
        self.ticks_at_next_step = window_end(0, self.ticks_per_step);
        self.pending_restart = false;
        self.events
            .insert(ClockEvents::RESTART | ClockEvents::STEP | ClockEvents::BEAT);
    }

    fn advance_free_running(&mut self) {
        let before = self.current_step();
        let next = self.ticks.saturating_add(self.ticks_per_ms);
        let wrapped = next >= TICKS_PER_BAR;
        self.ticks = next & BAR_MASK;
        let after = self.current_step();
        if wrapped || after != before {
            self.raise_step(after);
        }
    }

    fn advance_interpolated(&mut self) {
        let limit = self.ticks_at_next_step.saturating_sub(1);
        let next = self.ticks.saturating_add(self.ticks_per_ms).min(limit);
        self.ticks = next.max(self.ticks);
    }

    fn advance_step_window(&mut self) {
        let start = if self.ticks_at_next_step >= TICKS_PER_BAR {
            0
        } else {
            self.ticks_at_next_step
        };
        self.ticks = start;
        self.ticks_at_next_step = window_end(start, self.ticks_per_step);
        self.raise_step(self.current_step());
    }

    fn estimate_rate(&mut self) {
        let period = self.ms_since_pulse;
        if self.config.accepts_period(period) {
            self.ext_period_ms = Some(period);
            self.ticks_per_ms = self.rate_for_period(period);
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("timebase: ignored clock interval {=u32} ms", period);
        }
    }

    fn rate_for_period(&self, period_ms: u32) -> u64 {
        self.ticks_per_step
            .checked_div(u64::from(period_ms))
            .map_or(self.ticks_per_ms, |tpm| tpm.max(1))
    }

    fn step_start(&self, ticks: u64) -> u64 {
        let index = u64::from(self.current_step_at(ticks));
        index.saturating_mul(self.ticks_per_step)
    }

    fn current_step_at(&self, ticks: u64) -> u8 {
        let index = ticks.checked_div(self.ticks_per_step).unwrap_or(0);
        let last = self.steps.saturating_sub(1);
        u8::try_from(index).map_or(last, |i| i.min(last))
    }

    fn raise_step(&mut self, step: u8) {
        self.events.insert(ClockEvents::STEP);
        if step % 4 == 0 {
            self.events.insert(ClockEvents::BEAT);
        }
    }
}

impl Default for PulseTimebase {
    fn default() -> Self {
        Self::new(TimebaseConfig::DEFAULT)
    }
}
