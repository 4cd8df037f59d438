//! Action interpreter for interactive controls
//!
//! A button's `action` field is a short descriptor string parsed once, at
//! scene-build time, into an [`Action`]. The grammar is closed:
//!
//! | Descriptor | Action |
//! |---|---|
//! | `apply`, `change_color`, `increase_temp`, ... | [`Action::Builtin`] |
//! | `set_variable:<name>=<value>` | [`Action::SetVariable`] |
//! | `toggle_variable:<name>=<min>,<max>` | [`Action::ToggleVariable`] |
//! | anything else | no action (the control is inert) |
//!
//! A recognised prefix with a malformed body is an error; the caller reports
//! it and leaves the control without an action.

use crate::error::ActionParseError;
use crate::store::{PRESSURE_VARIABLE, STATUS_VARIABLE, TEMPERATURE_VARIABLE, VariableStore};

const SET_PREFIX: &str = "set_variable:";
const TOGGLE_PREFIX: &str = "toggle_variable:";

/// Number of distinct values the status builtin cycles through
const STATUS_CYCLE: u8 = 10;

/// The fixed builtin catalog
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinAction {
    /// Notification only
    Apply,
    /// Cycles a counter owned by this action value through 0..=9 and writes
    /// it to the status variable
    ChangeStatus { counter: u8 },
    IncreaseTemperature,
    DecreaseTemperature,
    IncreasePressure,
    DecreasePressure,
}

impl BuiltinAction {
    /// Look up a builtin by wire name or descriptive alias
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "apply" => BuiltinAction::Apply,
            "change_color" | "change-status" => BuiltinAction::ChangeStatus { counter: 0 },
            "increase_temp" | "increase-temperature" => BuiltinAction::IncreaseTemperature,
            "decrease_temp" | "decrease-temperature" => BuiltinAction::DecreaseTemperature,
            "increase_pressure" | "increase-pressure" => BuiltinAction::IncreasePressure,
            "decrease_pressure" | "decrease-pressure" => BuiltinAction::DecreasePressure,
            _ => return None,
        };
        Some(builtin)
    }

    /// Wire name as written in scene documents
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinAction::Apply => "apply",
            BuiltinAction::ChangeStatus { .. } => "change_color",
            BuiltinAction::IncreaseTemperature => "increase_temp",
            BuiltinAction::DecreaseTemperature => "decrease_temp",
            BuiltinAction::IncreasePressure => "increase_pressure",
            BuiltinAction::DecreasePressure => "decrease_pressure",
        }
    }

    fn invoke(&mut self, store: &VariableStore) {
        match self {
            BuiltinAction::Apply => {
                tracing::info!("Apply button clicked");
            }
            BuiltinAction::ChangeStatus { counter } => {
                *counter = (*counter + 1) % STATUS_CYCLE;
                store.set(STATUS_VARIABLE, f64::from(*counter));
                tracing::info!("Panel status changed to: {}", counter);
            }
            BuiltinAction::IncreaseTemperature => nudge(store, TEMPERATURE_VARIABLE, 1.0),
            BuiltinAction::DecreaseTemperature => nudge(store, TEMPERATURE_VARIABLE, -1.0),
            BuiltinAction::IncreasePressure => nudge(store, PRESSURE_VARIABLE, 0.5),
            BuiltinAction::DecreasePressure => nudge(store, PRESSURE_VARIABLE, -0.5),
        }
    }
}

fn nudge(store: &VariableStore, name: &str, delta: f64) {
    let next = store.get(name) + delta;
    store.set(name, next);
    tracing::info!("Variable '{}' adjusted by {:+} to {}", name, delta, next);
}

/// A parsed, invocable control effect
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Builtin(BuiltinAction),
    SetVariable { name: String, value: f64 },
    ToggleVariable { name: String, min: i32, max: i32 },
}

impl Action {
    /// Parse a descriptor.
    ///
    /// Returns `Ok(None)` for strings outside the grammar and an error for a
    /// recognised prefix whose body does not parse.
    pub fn parse(descriptor: &str) -> Result<Option<Action>, ActionParseError> {
        let descriptor = descriptor.trim();

        if let Some(builtin) = BuiltinAction::from_name(descriptor) {
            return Ok(Some(Action::Builtin(builtin)));
        }

        if let Some(body) = descriptor.strip_prefix(SET_PREFIX) {
            let malformed = || ActionParseError::SetVariable(descriptor.to_string());
            let (name, value) = split_assignment(body).ok_or_else(malformed)?;
            let value: f64 = value.parse().map_err(|_| malformed())?;
            return Ok(Some(Action::SetVariable {
                name: name.to_string(),
                value,
            }));
        }

        if let Some(body) = descriptor.strip_prefix(TOGGLE_PREFIX) {
            let malformed = || ActionParseError::ToggleVariable(descriptor.to_string());
            let (name, range) = split_assignment(body).ok_or_else(malformed)?;
            let (min, max) = range.split_once(',').ok_or_else(malformed)?;
            let min: i32 = min.trim().parse().map_err(|_| malformed())?;
            let max: i32 = max.trim().parse().map_err(|_| malformed())?;
            if max < 0 {
                return Err(ActionParseError::NegativeToggleMax {
                    descriptor: descriptor.to_string(),
                    max: i64::from(max),
                });
            }
            return Ok(Some(Action::ToggleVariable {
                name: name.to_string(),
                min,
                max,
            }));
        }

        Ok(None)
    }

    /// Run the effect against the store
    pub fn invoke(&mut self, store: &VariableStore) {
        match self {
            Action::Builtin(builtin) => builtin.invoke(store),
            Action::SetVariable { name, value } => {
                store.set(name, *value);
                tracing::info!("Variable '{}' set to: {}", name, value);
            }
            Action::ToggleVariable { name, min, max } => {
                let next = toggle_next(store.get(name), *min, *max);
                store.set(name, next);
                tracing::info!("Variable '{}' toggled to: {}", name, next);
            }
        }
    }
}

/// `(current + 1) mod (max + 1)`, clamped up to `min`. The current value is
/// truncated to an integer first.
pub fn toggle_next(current: f64, min: i32, max: i32) -> f64 {
    let current = current as i64;
    let modulus = i64::from(max) + 1;
    let next = current.saturating_add(1) % modulus;
    next.max(i64::from(min)) as f64
}

/// Split `name=value`, trimming both sides; the name must be non-empty
fn split_assignment(body: &str) -> Option<(&str, &str)> {
    let (name, value) = body.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Builtin(b) => write!(f, "{}", b.name()),
            Action::SetVariable { name, value } => write!(f, "{}{}={}", SET_PREFIX, name, value),
            Action::ToggleVariable { name, min, max } => {
                write!(f, "{}{}={},{}", TOGGLE_PREFIX, name, min, max)
            }
        }
    }
}
