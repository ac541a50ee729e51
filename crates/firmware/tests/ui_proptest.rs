//! Property tests for the panel state machine.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use firmware::{Pots, Ui, UiCommand, UiMode};
use platform::config::{DEBOUNCE_MS, NUM_POTS};
use platform::mocks::MockIndicators;
use platform::PotReading;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Gesture {
    Hold { pressed: bool, ms: u16 },
    Turn { pot: usize, value: u8 },
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (any::<bool>(), 1u16..400).prop_map(|(pressed, ms)| Gesture::Hold { pressed, ms }),
        (0usize..NUM_POTS, any::<u8>()).prop_map(|(pot, value)| Gesture::Turn { pot, value }),
    ]
}

/// Feed one reading to `pot`, leaving the others as they are.
fn turn(pots: &mut Pots, pot: usize, value: u8) {
    for _ in 0..NUM_POTS {
        let reading = if pots.channel() == pot {
            PotReading::new(value)
        } else {
            pots.reading(pots.channel())
        };
        pots.on_sample(reading);
    }
}

proptest! {
    /// However the panel is handled, letting go of the button for longer
    /// than the debounce time always lands back in pattern mode.
    #[test]
    fn release_returns_to_pattern(gestures in prop::collection::vec(gesture(), 1..40)) {
        let mut ui = Ui::new();
        let mut pots = Pots::default();
        let mut leds = MockIndicators::new();
        for g in gestures {
            match g {
                Gesture::Hold { pressed, ms } => {
                    for _ in 0..ms {
                        pots.on_ms();
                        ui.on_ms(pressed, &mut pots, &mut leds);
                    }
                }
                Gesture::Turn { pot, value } => turn(&mut pots, pot, value),
            }
            leds.clear();
        }
        for _ in 0..=DEBOUNCE_MS {
            pots.on_ms();
            ui.on_ms(false, &mut pots, &mut leds);
        }
        prop_assert_eq!(ui.mode(), UiMode::Pattern);
        prop_assert!(!ui.is_pressed());
    }

    /// Restarts only come from a button edge, never from pots alone.
    #[test]
    fn pots_alone_never_restart(turns in prop::collection::vec((0usize..NUM_POTS, any::<u8>()), 1..20)) {
        let mut ui = Ui::new();
        let mut pots = Pots::default();
        let mut leds = MockIndicators::new();
        for (pot, value) in turns {
            turn(&mut pots, pot, value);
            for _ in 0..50 {
                pots.on_ms();
                let cmds = ui.on_ms(false, &mut pots, &mut leds);
                prop_assert!(!cmds.contains(&UiCommand::Restart));
                prop_assert!(cmds
                    .iter()
                    .all(|c| matches!(c, UiCommand::RecalcPattern(_))));
            }
        }
    }
}
