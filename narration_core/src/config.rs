//! Simulation configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Timing and prompt settings for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How long an observation must stay unchanged before it can fire.
    pub stable_duration_secs: f32,

    /// Minimum time between two narration triggers.
    pub cooldown_secs: f32,

    /// Whether keyword and details are added to the prompt.
    pub include_metadata_in_prompt: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stable_duration_secs: 3.0,
            cooldown_secs: 10.0,
            include_metadata_in_prompt: true,
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or non-finite durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("stable_duration_secs", self.stable_duration_secs)?;
        check_duration("cooldown_secs", self.cooldown_secs)
    }
}

fn check_duration(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{} is not a finite number", value),
        });
    }
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{} is negative", value),
        });
    }
    Ok(())
}
