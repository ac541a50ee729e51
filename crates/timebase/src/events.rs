//! Edge-triggered clock events.

/// Set of events raised by the timebase since the last read.
///
/// The timebase ORs flags in; the reader takes the whole byte and clears it,
/// so each occurrence is delivered once. Two steps between reads collapse
/// into one `STEP`, which is what the LED blink wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ClockEvents(u8);

impl ClockEvents {
    /// No events.
    pub const NONE: Self = Self(0);
    /// The position entered a new step.
    pub const STEP: Self = Self(1 << 0);
    /// The new step is a multiple of four (a beat of a 4/4 bar).
    pub const BEAT: Self = Self(1 << 1);
    /// The bar was restarted by a reset, a software request or a clock handoff.
    pub const RESTART: Self = Self(1 << 2);

    /// Raw flag byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set every flag in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear every flag in `other`, returning whether any of them was set.
    pub fn remove(&mut self, other: Self) -> bool {
        let was_set = self.0 & other.0 != 0;
        self.0 &= !other.0;
        was_set
    }
}

impl core::ops::BitOr for ClockEvents {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for ClockEvents {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}
