//! Type system enforcement tests for clock configuration newtypes.
//! The UI only hands the core values that went through these types.

#![allow(clippy::unwrap_used)]

// ── Bpm ──────────────────────────────────────────────────────────────────────

#[test]
fn bpm_new_clamps_zero_to_minimum() {
    use platform::Bpm;
    assert_eq!(Bpm::new(0).get(), 1, "Bpm::new(0) should clamp to 1");
}

#[test]
fn bpm_new_clamps_above_maximum() {
    use platform::Bpm;
    assert_eq!(Bpm::new(5000).get(), Bpm::MAX);
}

#[test]
fn bpm_try_new_rejects_zero() {
    use platform::Bpm;
    let err = Bpm::try_new(0).unwrap_err();
    assert_eq!(err.value, 0);
    assert_eq!(err.min, 1);
}

#[test]
fn bpm_default_is_120() {
    use platform::Bpm;
    assert_eq!(Bpm::default().get(), 120);
}

#[test]
fn bpm_is_two_bytes() {
    use platform::Bpm;
    assert_eq!(core::mem::size_of::<Bpm>(), 2);
}

// ── StepCount ────────────────────────────────────────────────────────────────

#[test]
fn step_count_default_is_16() {
    use platform::StepCount;
    assert_eq!(StepCount::default().get(), 16);
}

#[test]
fn step_count_menu_values() {
    use platform::StepCount;
    let values: Vec<u8> = (0..4).map(|o| StepCount::from_menu(o).unwrap().get()).collect();
    assert_eq!(values, vec![4, 8, 16, 32]);
}

#[test]
fn step_count_try_new_rejects_zero_and_over_64() {
    use platform::StepCount;
    assert!(StepCount::try_new(0).is_err());
    assert!(StepCount::try_new(65).is_err());
    assert!(StepCount::try_new(64).is_ok());
}

// ── TrigCount ────────────────────────────────────────────────────────────────

#[test]
fn trig_count_clamps_to_tempo_map_capacity() {
    use platform::TrigCount;
    assert_eq!(TrigCount::new(200).get(), 32);
    assert_eq!(TrigCount::new(0).get(), 1);
}

#[test]
fn trig_count_menu_out_of_range_is_error() {
    use platform::TrigCount;
    assert!(TrigCount::from_menu(7).is_err());
}

// ── OutOfRangeError ──────────────────────────────────────────────────────────

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::StepCount;
    let err = StepCount::try_new(99).unwrap_err();
    assert_eq!(err.to_string(), "value 99 outside 1..=64");
}
