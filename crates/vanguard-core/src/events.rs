//! Scripted event records.
//!
//! Events live on the world and are evaluated once per tick after the
//! weapons pass. Each fires at most once.

use serde::{Deserialize, Serialize};

/// Condition under which a scripted event fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires when world time reaches `at` seconds.
    Time { at: f64 },
    /// Fires when entities `a` and `b` close within `range` meters.
    Proximity { a: String, b: String, range: f64 },
    /// Fires when `sensor`'s current radar detections contain `target`.
    Detection { sensor: String, target: String },
}

/// What happens when the trigger fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Operator-diagnostic side channel; no effect on simulation state.
    Message { text: String },
    /// Set a boolean or rules field on the target entity.
    SetState {
        target: String,
        field: String,
        value: String,
    },
    /// Replace the target entity's engagement rules.
    ChangeRules { target: String, value: String },
}

/// A scripted event. `fired` latches: once true it never re-fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub id: String,
    pub name: String,
    pub trigger: Trigger,
    pub action: Action,
    pub fired: bool,
}

impl ScriptedEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, trigger: Trigger, action: Action) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger,
            action,
            fired: false,
        }
    }
}
