//! Situation labels and the per-tick observation record.

use mark_rules::{Mark, Sector};
use serde::{Deserialize, Serialize};

/// The probe's relationship to the nearest mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    /// No mark's trigger region contains the probe.
    None,
    /// Inside a trigger region but outside the footprint.
    Near,
    /// Inside the footprint itself.
    Inside,
}

impl std::fmt::Display for Situation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Situation::None => "none",
            Situation::Near => "near",
            Situation::Inside => "inside",
        };
        f.write_str(text)
    }
}

/// Everything derived from one probe sample. Rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub situation: Situation,

    /// Label of the nearest mark, absent when the situation is `None`.
    pub label: Option<String>,

    /// Direction of the mark as seen from the probe.
    pub sector: Sector,

    /// Narration metadata copied from the mark.
    pub keyword: String,
    pub details: String,
}

impl Observation {
    /// An observation with no mark in range.
    pub fn nothing() -> Self {
        Self {
            situation: Situation::None,
            label: None,
            sector: Sector::Here,
            keyword: String::new(),
            details: String::new(),
        }
    }

    /// An observation of `mark` in the given situation and direction.
    pub fn of_mark(mark: &Mark, situation: Situation, sector: Sector) -> Self {
        Self {
            situation,
            label: Some(mark.label.clone()),
            sector,
            keyword: mark.keyword.clone(),
            details: mark.details.clone(),
        }
    }

    /// Narration text describing this observation.
    pub fn message(&self) -> String {
        match (self.situation, self.label.as_deref()) {
            (Situation::Inside, Some(label)) => {
                format!("The user is right inside the {}.", label)
            }
            (Situation::Near, Some(label)) => format!(
                "The user is now near {}, the {} is {} of the user.",
                label, label, self.sector
            ),
            _ => "No mark nearby.".to_string(),
        }
    }
}
