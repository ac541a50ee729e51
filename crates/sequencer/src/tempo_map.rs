//! Trigger positions across the bar.
//!
//! Four pots shape the spacing: pot *k* controls the quarter of the
//! triggers `k·n/4 .. (k+1)·n/4`. Centered pots give evenly spaced triggers.
//! Below center the intervals grow through that quarter (slowing down),
//! above center they shrink (speeding up). Each interval is integrated from
//! a running rate, so the curve stays smooth across quarter boundaries.

use platform::config::NUM_POTS;
use platform::{PotReading, TrigCount};
use thiserror_no_std::Error;

/// Tempo map capacity.
pub const MAX_TRIGS: usize = 32;

/// One bar in position units. `PulseTimebase::position` covers `0..65536`,
/// so step `k` of `n` begins exactly at `k * 65536 / n`. An external clock
/// holds the position one tick short of the next step until its edge, so
/// an even map must land on the step boundary itself, not below it.
const POSITION_SPAN: u64 = 0x1_0000;

/// Pot reading that leaves the running rate unchanged.
const NEUTRAL: i32 = 128;

/// Errors from building a tempo map out of explicit positions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempoMapError {
    /// No positions given.
    #[error("tempo map needs at least one trigger")]
    Empty,
    /// More positions than the map holds.
    #[error("{len} triggers exceed capacity of 32")]
    TooManyTrigs {
        /// Number of positions given.
        len: usize,
    },
    /// A position is lower than the one before it.
    #[error("trigger {index} is earlier than the one before it")]
    NotMonotonic {
        /// Index of the offending position.
        index: usize,
    },
}

/// Precomputed trigger positions, non-decreasing, in `0..=65535`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoMap {
    positions: heapless::Vec<u16, MAX_TRIGS>,
    controls: [PotReading; NUM_POTS],
}

impl TempoMap {
    /// Sixteen evenly spaced triggers.
    pub fn new() -> Self {
        Self::uniform(TrigCount::DEFAULT)
    }

    /// `n` evenly spaced triggers, the first at position zero.
    pub fn uniform(n: TrigCount) -> Self {
        let mut map = Self {
            positions: heapless::Vec::new(),
            controls: [PotReading::CENTER; NUM_POTS],
        };
        map.rebuild(usize::from(n.get()));
        map
    }

    /// Use explicit positions.
    ///
    /// Ties are allowed and fire in index order.
    pub fn from_positions(positions: &[u16]) -> Result<Self, TempoMapError> {
        if positions.is_empty() {
            return Err(TempoMapError::Empty);
        }
        if let Some(index) = positions
            .windows(2)
            .position(|w| matches!(w, [a, b] if b < a))
        {
            return Err(TempoMapError::NotMonotonic {
                index: index.saturating_add(1),
            });
        }
        let positions = heapless::Vec::from_slice(positions).map_err(|_| {
            TempoMapError::TooManyTrigs {
                len: positions.len(),
            }
        })?;
        Ok(Self {
            positions,
            controls: [PotReading::CENTER; NUM_POTS],
        })
    }

    /// Rebuild from new pot readings, keeping the trigger count.
    pub fn recalc(&mut self, controls: [PotReading; NUM_POTS]) {
        self.controls = controls;
        self.rebuild(self.positions.len().max(1));
    }

    /// Rebuild with a new trigger count, keeping the pot readings.
    pub fn set_num_trigs(&mut self, n: TrigCount) {
        self.rebuild(usize::from(n.get()));
    }

    /// Position of trigger `i`, or `None` past the end.
    pub fn trig(&self, i: usize) -> Option<u16> {
        self.positions.get(i).copied()
    }

    /// All positions in firing order.
    pub fn positions(&self) -> &[u16] {
        &self.positions
    }

    /// Number of triggers per bar.
    pub fn num_trigs(&self) -> usize {
        self.positions.len()
    }

    /// Pot readings the map was last built from.
    pub fn controls(&self) -> [PotReading; NUM_POTS] {
        self.controls
    }

    fn control_for(&self, i: usize, n: usize) -> i32 {
        let quarter = i.saturating_mul(NUM_POTS).checked_div(n).unwrap_or(0);
        self.controls
            .get(quarter)
            .map_or(NEUTRAL, |p| i32::from(p.get()))
    }

    fn rebuild(&mut self, n: usize) {
        let n = n.clamp(1, MAX_TRIGS);

        // Running rate per trigger. The rate reached after the last trigger
        // counts toward the slowest too, then everything shifts so the
        // slowest is NEUTRAL.
        let mut rates = [0i32; MAX_TRIGS];
        let mut rate = NEUTRAL;
        let mut slowest = NEUTRAL;
        for (i, slot) in rates.iter_mut().enumerate().take(n) {
            *slot = rate;
            rate = rate.saturating_add(NEUTRAL.saturating_sub(self.control_for(i, n)));
            slowest = slowest.min(rate);
        }

        let mut starts = [0u64; MAX_TRIGS];
        let mut distance: u64 = 0;
        for (start, &r) in starts.iter_mut().zip(rates.iter()).take(n) {
            *start = distance;
            let interval = r.saturating_sub(slowest).saturating_add(NEUTRAL);
            distance = distance.saturating_add(u64::from(interval.unsigned_abs()));
        }

        // start < distance, so every scaled start is below 65536.
        self.positions = starts
            .iter()
            .take(n)
            .map(|&start| {
                let scaled = start
                    .saturating_mul(POSITION_SPAN)
                    .checked_div(distance)
                    .unwrap_or(0);
                u16::try_from(scaled).unwrap_or(u16::MAX)
            })
            .collect();
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn pots(values: [u8; 4]) -> [PotReading; 4] {
        values.map(PotReading::new)
    }

    #[test]
    fn default_is_sixteen_even_triggers() {
        let map = TempoMap::new();
        assert_eq!(map.num_trigs(), 16);
        for (i, &p) in map.positions().iter().enumerate() {
            assert_eq!(usize::from(p), 4096 * i, "trigger {i}");
        }
    }

    #[test]
    fn centered_pots_keep_even_spacing() {
        let mut map = TempoMap::uniform(TrigCount::new(8));
        let before = map.clone();
        map.recalc(pots([128; 4]));
        assert_eq!(map.positions(), before.positions());
    }

    #[test]
    fn low_pot_spreads_later_triggers() {
        // Pot 0 low: rate climbs through the first quarter, so the intervals
        // get longer and the second trigger lands before the even grid.
        let mut map = TempoMap::uniform(TrigCount::new(16));
        map.recalc(pots([0, 128, 128, 128]));
        let even = TempoMap::uniform(TrigCount::new(16));
        assert!(map.trig(1).unwrap() < even.trig(1).unwrap());
        assert_eq!(map.trig(0), Some(0));
    }

    #[test]
    fn rate_after_last_trigger_sets_the_floor() {
        // Last quarter speeds up: the rate after trigger 7 is the slowest,
        // so every interval before it is stretched and the triggers pull
        // in from the even grid.
        let mut map = TempoMap::uniform(TrigCount::new(8));
        map.recalc(pots([128, 128, 128, 255]));
        assert_eq!(
            map.positions(),
            &[0, 8547, 17094, 25641, 34188, 42736, 51283, 59830]
        );
    }

    #[test]
    fn extreme_pots_stay_monotonic() {
        for values in [[0, 255, 0, 255], [255, 255, 255, 255], [0, 0, 0, 0]] {
            let mut map = TempoMap::uniform(TrigCount::new(32));
            map.recalc(pots(values));
            assert!(map.positions().windows(2).all(|w| w[0] <= w[1]), "{values:?}");
            assert_eq!(map.num_trigs(), 32);
        }
    }

    #[test]
    fn trig_count_change_keeps_controls() {
        let mut map = TempoMap::new();
        map.recalc(pots([10, 20, 30, 40]));
        map.set_num_trigs(TrigCount::new(4));
        assert_eq!(map.num_trigs(), 4);
        assert_eq!(map.controls(), pots([10, 20, 30, 40]));
    }

    #[test]
    fn explicit_positions_validate() {
        assert_eq!(TempoMap::from_positions(&[]), Err(TempoMapError::Empty));
        assert_eq!(
            TempoMap::from_positions(&[0, 100, 50]),
            Err(TempoMapError::NotMonotonic { index: 2 })
        );
        assert_eq!(
            TempoMap::from_positions(&[0; 33]),
            Err(TempoMapError::TooManyTrigs { len: 33 })
        );
        let map = TempoMap::from_positions(&[0, 0, 9000]).unwrap();
        assert_eq!(map.trig(1), Some(0));
        assert_eq!(map.trig(3), None);
    }

    #[test]
    fn error_messages_name_the_index() {
        let err = TempoMapError::NotMonotonic { index: 4 };
        assert_eq!(err.to_string(), "trigger 4 is earlier than the one before it");
    }
}
