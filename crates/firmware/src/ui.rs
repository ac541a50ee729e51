//! One button, four pots.
//!
//! Pattern mode: turning a pot reshapes the tempo map once it has settled;
//! a double click restarts the bar.
//!
//! Holding the button while turning pot *k* opens menu *k*. The pot then
//! selects one of four options (`reading / 64`, shown on the position bar)
//! or, for the tempo menu, a BPM (`15 + 2 * reading`). The value is
//! committed when the pot settles. Letting go of the button commits
//! whatever is still pending, returns to pattern mode and restarts the bar.
//!
//! | Pot | Menu          | Options                              |
//! |-----|---------------|--------------------------------------|
//! | 0   | steps per bar | 4, 8, 16, 32                         |
//! | 1   | triggers      | 4, 8, 16, 32                         |
//! | 2   | reset mode    | restart, one-shot, run, restart+run  |
//! | 3   | tempo         | 15–525 bpm                           |

use platform::config::{BLINK_HOLD, DEBOUNCE_MS, DOUBLE_CLICK_MS, NUM_POTS, POT_SETTLE_MS};
use platform::{Bpm, Indicators, PotReading, StepCount, TrigCount};
use sequencer::ResetMode;
use thiserror_no_std::Error;

use crate::pots::Pots;

/// Most commands one millisecond of UI can produce.
pub const MAX_COMMANDS: usize = 4;

/// What the UI asks the rest of the firmware to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiCommand {
    /// Clock steps per bar.
    SetStepCount(StepCount),
    /// Triggers per bar.
    SetTrigCount(TrigCount),
    /// Reset-jack policy.
    SetResetMode(ResetMode),
    /// Internal tempo.
    SetBpm(Bpm),
    /// Rebuild the tempo map from these pot readings.
    RecalcPattern([PotReading; NUM_POTS]),
    /// Restart the bar.
    Restart,
}

/// Commands from one UI step, in order.
pub type Commands = heapless::Vec<UiCommand, MAX_COMMANDS>;

/// Errors turning a pot into a menu value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// There is no menu behind this pot.
    #[error("no menu on pot {0}")]
    NoSuchPot(usize),
    /// The option does not exist in this menu.
    #[error("option {option} not in the {menu} menu")]
    NoSuchOption {
        /// Menu name.
        menu: &'static str,
        /// Option index.
        option: u8,
    },
}

/// The four settings menus, one per pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Menu {
    /// Clock steps per bar.
    StepCount,
    /// Triggers per bar.
    TrigCount,
    /// Reset-jack policy.
    ResetMode,
    /// Internal tempo.
    Bpm,
}

impl Menu {
    /// Menus in pot order.
    pub const ALL: [Self; NUM_POTS] =
        [Self::StepCount, Self::TrigCount, Self::ResetMode, Self::Bpm];

    /// Menu opened by turning `pot` with the button held.
    pub fn from_pot(pot: usize) -> Result<Self, MenuError> {
        Self::ALL.get(pot).copied().ok_or(MenuError::NoSuchPot(pot))
    }

    /// Pot that drives this menu.
    pub fn pot(self) -> usize {
        match self {
            Self::StepCount => 0,
            Self::TrigCount => 1,
            Self::ResetMode => 2,
            Self::Bpm => 3,
        }
    }

    /// Short name for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::StepCount => "steps",
            Self::TrigCount => "triggers",
            Self::ResetMode => "reset mode",
            Self::Bpm => "tempo",
        }
    }

    /// The command selecting what `reading` points at.
    pub fn commit(self, reading: PotReading) -> Result<UiCommand, MenuError> {
        let option = reading.menu_option();
        let no_such = MenuError::NoSuchOption {
            menu: self.name(),
            option,
        };
        let cmd = match self {
            Self::StepCount => {
                UiCommand::SetStepCount(StepCount::from_menu(option).map_err(|_| no_such)?)
            }
            Self::TrigCount => {
                UiCommand::SetTrigCount(TrigCount::from_menu(option).map_err(|_| no_such)?)
            }
            Self::ResetMode => {
                UiCommand::SetResetMode(ResetMode::from_menu(option).map_err(|_| no_such)?)
            }
            Self::Bpm => UiCommand::SetBpm(Bpm::from_pot(reading)),
        };
        Ok(cmd)
    }
}

/// Pattern mode or one of the menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiMode {
    /// Normal running.
    Pattern,
    /// Editing a setting.
    Menu(Menu),
}

/// Button and pot state machine. Call [`on_ms`](Self::on_ms) once per
/// millisecond from the poll loop.
#[derive(Debug, Clone)]
pub struct Ui {
    mode: UiMode,
    pressed: bool,
    debounce: u16,
    double_click: u16,
    /// Counts down after the last pot movement.
    settle: u16,
    /// Menu option currently lit on the position bar.
    shown: Option<u8>,
}

impl Ui {
    /// Pattern mode, button up.
    pub const fn new() -> Self {
        Self {
            mode: UiMode::Pattern,
            pressed: false,
            debounce: 0,
            double_click: 0,
            settle: 0,
            shown: None,
        }
    }

    /// Advance one millisecond. `pressed` is the raw button level.
    pub fn on_ms<L: Indicators>(
        &mut self,
        pressed: bool,
        pots: &mut Pots,
        leds: &mut L,
    ) -> Commands {
        let mut out = Commands::new();

        self.debounce = self.debounce.saturating_sub(1);
        self.double_click = self.double_click.saturating_sub(1);
        let mut settled = false;
        if self.settle > 0 {
            self.settle = self.settle.saturating_sub(1);
            settled = self.settle == 0;
        }

        if self.debounce == 0 && pressed != self.pressed {
            self.pressed = pressed;
            self.debounce = DEBOUNCE_MS;
            if pressed {
                self.on_press(&mut out);
            } else {
                self.on_release(pots, leds, &mut out);
                settled = false;
            }
        }

        if pots.take_moved().is_some() {
            self.settle = POT_SETTLE_MS;
            settled = false;
        }
        if self.mode == UiMode::Pattern && self.pressed {
            if let Some(menu) = pots.active().and_then(|pot| Menu::from_pot(pot).ok()) {
                self.enter(menu);
            }
        }

        match self.mode {
            UiMode::Menu(menu) => {
                let option = pots.reading(menu.pot()).menu_option();
                if self.shown != Some(option) {
                    leds.show_position(option, BLINK_HOLD);
                    self.shown = Some(option);
                }
                if settled {
                    commit(menu, pots, &mut out);
                }
            }
            UiMode::Pattern => {
                if settled {
                    push(&mut out, UiCommand::RecalcPattern(pots.readings()));
                }
            }
        }
        out
    }

    /// Current mode.
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Debounced button state.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether a pot movement is waiting to settle.
    pub fn is_settling(&self) -> bool {
        self.settle > 0
    }

    fn on_press(&mut self, out: &mut Commands) {
        if self.double_click > 0 {
            self.double_click = 0;
            if self.mode == UiMode::Pattern {
                push(out, UiCommand::Restart);
            }
        } else {
            self.double_click = DOUBLE_CLICK_MS;
        }
    }

    fn on_release<L: Indicators>(&mut self, pots: &Pots, leds: &mut L, out: &mut Commands) {
        if let UiMode::Menu(menu) = self.mode {
            if self.settle > 0 {
                self.settle = 0;
                commit(menu, pots, out);
            }
            leds.clear_position();
            self.mode = UiMode::Pattern;
            self.shown = None;
            push(out, UiCommand::Restart);
        }
    }

    fn enter(&mut self, menu: Menu) {
        self.mode = UiMode::Menu(menu);
        self.shown = None;
        self.double_click = 0;
        #[cfg(feature = "defmt")]
        defmt::debug!("ui: {=str} menu", menu.name());
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

fn commit(menu: Menu, pots: &Pots, out: &mut Commands) {
    match menu.commit(pots.reading(menu.pot())) {
        Ok(cmd) => {
            #[cfg(feature = "defmt")]
            defmt::info!("ui: {}", cmd);
            push(out, cmd);
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("ui: {}", _e);
        }
    }
}

fn push(out: &mut Commands, cmd: UiCommand) {
    if out.push(cmd).is_err() {
        #[cfg(feature = "defmt")]
        defmt::warn!("ui: command dropped");
    }
}
