//! Reset-jack policy.
//!
//! | Mode        | Rising edge                      | Falling edge    |
//! |-------------|----------------------------------|-----------------|
//! | Restart     | restart                          | —               |
//! | OneShot     | restart (plays one bar)          | —               |
//! | Run         | enable output                    | disable output  |
//! | RestartRun  | restart, enable output           | disable output  |

use platform::{Edge, PinState};
use thiserror_no_std::Error;

/// How an edge on the reset jack affects the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetMode {
    /// Rising edge restarts the bar.
    #[default]
    Restart,
    /// Rising edge restarts the bar and plays it once.
    OneShot,
    /// The jack is a run gate: high plays, low mutes.
    Run,
    /// Rising edge restarts and plays, low mutes.
    RestartRun,
}

/// Menu option outside the four reset modes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("no reset mode for menu option {0}")]
pub struct ResetModeError(pub u8);

impl ResetMode {
    /// Modes in menu order.
    pub const MENU: [Self; 4] = [Self::Restart, Self::OneShot, Self::Run, Self::RestartRun];

    /// Menu entry `option` (0–3).
    pub fn from_menu(option: u8) -> Result<Self, ResetModeError> {
        Self::MENU
            .get(usize::from(option))
            .copied()
            .ok_or(ResetModeError(option))
    }

    /// Index of this mode in [`MENU`](Self::MENU).
    pub fn menu_option(self) -> u8 {
        match self {
            Self::Restart => 0,
            Self::OneShot => 1,
            Self::Run => 2,
            Self::RestartRun => 3,
        }
    }

    /// Whether the jack level gates the output in this mode.
    pub fn is_gated(self) -> bool {
        matches!(self, Self::Run | Self::RestartRun)
    }

    /// Whether a rising edge restarts the bar in this mode.
    pub fn restarts_on_rise(self) -> bool {
        !matches!(self, Self::Run)
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::OneShot => "one-shot",
            Self::Run => "run",
            Self::RestartRun => "restart+run",
        }
    }
}

impl TryFrom<u8> for ResetMode {
    type Error = ResetModeError;

    fn try_from(option: u8) -> Result<Self, Self::Error> {
        Self::from_menu(option)
    }
}

/// Reset-jack state: mode, last level and the resulting output gate.
///
/// Lives in the tick context next to the timebase. The line is assumed high
/// until the first edge so an unpatched jack never mutes `Run` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetGate {
    mode: ResetMode,
    level: PinState,
    output_enabled: bool,
}

impl ResetGate {
    /// `Restart` mode, line high, output enabled.
    pub const fn new() -> Self {
        Self {
            mode: ResetMode::Restart,
            level: PinState::High,
            output_enabled: true,
        }
    }

    /// Apply a debounced edge. Returns `true` when the bar must restart.
    pub fn on_edge(&mut self, edge: Edge) -> bool {
        self.level = edge.level();
        match edge {
            Edge::Rising => {
                self.output_enabled = true;
                self.mode.restarts_on_rise()
            }
            Edge::Falling => {
                if self.mode.is_gated() {
                    self.output_enabled = false;
                }
                false
            }
        }
    }

    /// Apply a sampled level, turning it into an edge if it changed.
    pub fn on_level(&mut self, level: PinState) -> bool {
        match self.level.edge_to(level) {
            Some(edge) => self.on_edge(edge),
            None => false,
        }
    }

    /// Switch mode. Gated modes take the current line level immediately.
    pub fn set_mode(&mut self, mode: ResetMode) {
        self.mode = mode;
        self.output_enabled = if mode.is_gated() {
            self.level == PinState::High
        } else {
            true
        };
        #[cfg(feature = "defmt")]
        defmt::info!("reset mode: {=str}", mode.name());
    }

    /// Current mode.
    pub fn mode(&self) -> ResetMode {
        self.mode
    }

    /// Last level seen on the jack.
    pub fn level(&self) -> PinState {
        self.level
    }

    /// Whether the sequencer may drive the trigger output.
    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }
}

impl Default for ResetGate {
    fn default() -> Self {
        Self::new()
    }
}
