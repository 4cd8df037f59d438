//! Demonstration temperature control
//!
//! Nudges the temperature variable toward the setpoint with a three-tier
//! proportional law and records each new temperature in the temperature
//! history channel.

use crate::store::{
    VariableStore, SETPOINT_VARIABLE, TEMPERATURE_HISTORY, TEMPERATURE_VARIABLE,
};

/// Gaps wider than this move by a fixed step
const COARSE_GAP: f64 = 1.0;
const COARSE_STEP: f64 = 0.2;
/// Gaps wider than this (and within the coarse band) close by half
const FINE_GAP: f64 = 0.2;
const HALF_GAIN: f64 = 0.5;
const SETTLE_GAIN: f64 = 0.8;

/// Change to apply to `current` to approach `setpoint`
pub fn control_step(current: f64, setpoint: f64) -> f64 {
    let gap = setpoint - current;
    if gap.abs() > COARSE_GAP {
        COARSE_STEP.copysign(gap)
    } else if gap.abs() > FINE_GAP {
        gap * HALF_GAIN
    } else {
        gap * SETTLE_GAIN
    }
}

/// Run one control step against the store, returning the new temperature
pub fn run_control_step(store: &VariableStore) -> f64 {
    let current = store.get(TEMPERATURE_VARIABLE);
    let setpoint = store.get(SETPOINT_VARIABLE);
    let next = current + control_step(current, setpoint);

    store.set(TEMPERATURE_VARIABLE, next);
    store.push_history(TEMPERATURE_HISTORY, next);
    tracing::trace!("Control step {:.3} -> {:.3} (setpoint {:.3})", current, next, setpoint);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coarse_band_uses_fixed_step() {
        assert!((control_step(72.5, 65.0) + 0.2).abs() < 1e-12);
        assert!((control_step(60.0, 65.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_middle_band_halves_gap() {
        assert!((control_step(64.0, 65.0) - 0.5).abs() < 1e-12);
        assert!((control_step(65.5, 65.0) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_settle_band() {
        assert!((control_step(64.9, 65.0) - 0.08).abs() < 1e-9);
        assert_eq!(control_step(65.0, 65.0), 0.0);
    }

    #[test]
    fn test_step_updates_value_and_history() {
        let store = VariableStore::new();
        store.set(TEMPERATURE_VARIABLE, 72.5);
        store.set(SETPOINT_VARIABLE, 65.0);
        let before = store.history_len(TEMPERATURE_HISTORY);

        let next = run_control_step(&store);
        assert!((next - 72.3).abs() < 1e-9);
        assert_eq!(store.get(TEMPERATURE_VARIABLE), next);
        assert_eq!(store.history_len(TEMPERATURE_HISTORY), before + 1);
        assert_eq!(store.history(TEMPERATURE_HISTORY).last(), Some(&next));
    }

    proptest! {
        #[test]
        fn prop_step_never_overshoots(current in -500.0f64..500.0, setpoint in -500.0f64..500.0) {
            let next = current + control_step(current, setpoint);
            prop_assert!((setpoint - next).abs() <= (setpoint - current).abs() + 1e-9);
        }
    }
}
