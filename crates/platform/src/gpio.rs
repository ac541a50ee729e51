//! Digital line levels and edges
//!
//! The clock and reset jacks are single-wire inputs. The hardware glue
//! debounces them and reports either a level or an edge.

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl PinState {
    /// Edge produced by moving from `self` to `next`, if any.
    pub fn edge_to(self, next: PinState) -> Option<Edge> {
        match (self, next) {
            (Self::Low, Self::High) => Some(Edge::Rising),
            (Self::High, Self::Low) => Some(Edge::Falling),
            _ => None,
        }
    }
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Signal transition on a digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low → high
    Rising,
    /// High → low
    Falling,
}

impl Edge {
    /// Level the line sits at after this edge.
    pub fn level(self) -> PinState {
        match self {
            Self::Rising => PinState::High,
            Self::Falling => PinState::Low,
        }
    }
}
