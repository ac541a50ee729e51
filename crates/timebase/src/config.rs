//! Timebase tuning constants.

/// Tuning for [`PulseTimebase`](crate::PulseTimebase).
///
/// All durations are in ticks of the 1 ms timer. Construct with
/// [`TimebaseConfig::DEFAULT`] in `static` initialisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimebaseConfig {
    /// Shortest external pulse interval used for tempo estimation.
    /// Faster pulses still advance the step but keep the last good rate.
    pub min_ext_period_ms: u32,
    /// Longest external pulse interval used for tempo estimation.
    pub max_ext_period_ms: u32,
    /// How long after a clock edge a reset edge still counts as coincident.
    pub leading_clock_window_ms: u8,
    /// Tempo after power-on.
    pub default_bpm: u16,
    /// Steps per bar after power-on.
    pub default_steps: u8,
    /// Upper clamp for `set_step_count`.
    pub max_steps: u8,
}

impl TimebaseConfig {
    /// 10–3000 ms pulse window, 5 ms coincidence window, 120 BPM, 16 steps.
    pub const DEFAULT: Self = Self {
        min_ext_period_ms: 10,
        max_ext_period_ms: 3000,
        leading_clock_window_ms: 5,
        default_bpm: 120,
        default_steps: 16,
        max_steps: 64,
    };

    /// Same as [`DEFAULT`](Self::DEFAULT) with a 100 ms lower pulse bound,
    /// for clock sources with heavy edge jitter.
    pub const COARSE: Self = Self {
        min_ext_period_ms: 100,
        ..Self::DEFAULT
    };

    /// Whether `ms` is a usable interval between two external pulses.
    pub fn accepts_period(&self, ms: u32) -> bool {
        ms > 0 && (self.min_ext_period_ms..=self.max_ext_period_ms).contains(&ms)
    }
}

impl Default for TimebaseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_ten_to_three_thousand() {
        let cfg = TimebaseConfig::default();
        assert!(!cfg.accepts_period(9));
        assert!(cfg.accepts_period(10));
        assert!(cfg.accepts_period(3000));
        assert!(!cfg.accepts_period(3001));
    }

    #[test]
    fn coarse_rejects_fast_pulses() {
        assert!(!TimebaseConfig::COARSE.accepts_period(60));
        assert!(TimebaseConfig::COARSE.accepts_period(100));
    }

    #[test]
    fn zero_period_is_never_accepted() {
        let cfg = TimebaseConfig {
            min_ext_period_ms: 0,
            ..TimebaseConfig::DEFAULT
        };
        assert!(!cfg.accepts_period(0));
    }
}
