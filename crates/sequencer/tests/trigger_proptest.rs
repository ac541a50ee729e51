//! Property-based tests for trigger scheduling.

#![allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use platform::mocks::{MockIndicators, MockTrigger};
use platform::{PotReading, TrigCount};
use proptest::prelude::*;
use sequencer::{ClockSnapshot, Sequencer, TempoMap};
use timebase::ClockEvents;

fn snapshot(position: u16) -> ClockSnapshot {
    ClockSnapshot {
        position,
        events: ClockEvents::NONE,
        output_enabled: true,
    }
}

/// Strictly increasing positions covering one bar, ending at 65535.
fn bar_walk() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(1u16..4000, 1..200).prop_map(|steps| {
        let mut pos = 0u16;
        let mut walk = vec![0];
        for s in steps {
            pos = pos.saturating_add(s);
            walk.push(pos);
            if pos == u16::MAX {
                break;
            }
        }
        if *walk.last().unwrap_or(&0) != u16::MAX {
            walk.push(u16::MAX);
        }
        walk
    })
}

proptest! {
    /// Any tempo map, any polling pattern across one bar: each trigger
    /// index fires exactly once, in increasing order.
    #[test]
    fn one_bar_fires_each_trigger_once(
        trigs in 1u8..=32,
        pots in prop::array::uniform4(0u8..=255),
        walk in bar_walk(),
    ) {
        let mut map = TempoMap::uniform(TrigCount::new(trigs));
        map.recalc(pots.map(PotReading::new));
        let mut seq = Sequencer::new();
        let mut out = MockTrigger::new();
        let mut leds = MockIndicators::new();

        let mut order = Vec::new();
        for &pos in &walk {
            let before = seq.cursor();
            seq.advance(snapshot(pos), &map, &mut out, &mut leds);
            order.extend(before..seq.cursor());
        }
        prop_assert_eq!(out.count(), map.num_trigs());
        prop_assert_eq!(order, (0..map.num_trigs()).collect::<Vec<_>>());
    }

    /// Reshaping or resizing the map partway through a bar never fires an
    /// index twice: the bar carries on from the index it had reached.
    #[test]
    fn map_change_mid_bar_fires_each_index_once(
        trigs in 1u8..=32,
        new_trigs in 1u8..=32,
        pots in prop::array::uniform4(0u8..=255),
        resize in any::<bool>(),
        walk in bar_walk(),
        split in 0.0f64..1.0,
    ) {
        let mut map = TempoMap::uniform(TrigCount::new(trigs));
        let mut seq = Sequencer::new();
        let mut out = MockTrigger::new();
        let mut leds = MockIndicators::new();
        let at = ((walk.len() as f64) * split) as usize;

        let mut order = Vec::new();
        let mut reached = 0;
        for (i, &pos) in walk.iter().enumerate() {
            if i == at {
                reached = seq.cursor();
                if resize {
                    map.set_num_trigs(TrigCount::new(new_trigs));
                } else {
                    map.recalc(pots.map(PotReading::new));
                }
                seq.resync(&map);
            }
            let before = seq.cursor();
            seq.advance(snapshot(pos), &map, &mut out, &mut leds);
            order.extend(before..seq.cursor());
        }
        let last = reached.max(map.num_trigs());
        prop_assert_eq!(order, (0..last).collect::<Vec<_>>());
    }

    /// A wrap with the cursor at k fires k..n before the new bar.
    #[test]
    fn wrap_completes_the_old_bar(
        trigs in 1u8..=32,
        stop in 0u16..=u16::MAX,
        resume in 0u16..=u16::MAX,
    ) {
        prop_assume!(resume < stop);
        let map = TempoMap::uniform(TrigCount::new(trigs));
        let mut seq = Sequencer::new();
        let mut out = MockTrigger::new();
        let mut leds = MockIndicators::new();

        seq.advance(snapshot(stop), &map, &mut out, &mut leds);
        let k = seq.cursor();
        let before = out.take();
        prop_assert_eq!(before, k);

        seq.advance(snapshot(resume), &map, &mut out, &mut leds);
        let new_bar = map.positions().iter().filter(|&&p| p <= resume).count();
        prop_assert_eq!(out.count(), map.num_trigs() - k + new_bar);
        prop_assert_eq!(seq.cursor(), new_bar);
    }

    /// Recalculated maps are always non-decreasing and start at zero.
    #[test]
    fn recalc_is_monotonic(trigs in 1u8..=32, pots in prop::array::uniform4(0u8..=255)) {
        let mut map = TempoMap::uniform(TrigCount::new(trigs));
        map.recalc(pots.map(PotReading::new));
        prop_assert_eq!(map.trig(0), Some(0));
        prop_assert!(map.positions().windows(2).all(|w| w[0] <= w[1]));
    }
}
