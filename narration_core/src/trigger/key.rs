//! Trigger keys and phases.

use serde::{Deserialize, Serialize};

use crate::observation::{Observation, Situation};

/// Composite key identifying what a narration was about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerKey {
    pub label: String,
    pub situation: Situation,
}

impl TriggerKey {
    /// Create a new key for a (label, situation) pair.
    pub fn new(label: impl Into<String>, situation: Situation) -> Self {
        Self {
            label: label.into(),
            situation,
        }
    }

    /// The key of an observation. `None` situations have no key and can never fire.
    pub fn of(observation: &Observation) -> Option<Self> {
        match (observation.situation, observation.label.as_deref()) {
            (Situation::None, _) | (_, None) => None,
            (situation, Some(label)) => Some(Self::new(label, situation)),
        }
    }
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.label, self.situation)
    }
}

/// Coarse state of the trigger state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    /// Nothing observed since the last reset.
    Idle,
    /// Waiting for the current observation to become stable.
    Observing,
    /// A trigger fired and the cooldown is still running.
    Triggered,
}
