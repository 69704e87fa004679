//! Editing inputs: finalized rectangle drafts and free-text trigger edits.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Mark, MarkDefaults};

/// A rectangle drawn on the ground plane, not yet registered under a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkDraft {
    pub position: Vec3,
    pub scale: Vec3,
}

impl MarkDraft {
    /// Build a draft from two opposite corners of a drag and an extrusion height.
    ///
    /// The base of the draft sits on the lower of the two corners.
    pub fn from_corners(corner_a: Vec3, corner_b: Vec3, height: f32) -> Self {
        let ground = corner_a.y.min(corner_b.y);
        let position = Vec3::new(
            (corner_a.x + corner_b.x) / 2.0,
            ground + height / 2.0,
            (corner_a.z + corner_b.z) / 2.0,
        );
        let scale = Vec3::new(
            (corner_a.x - corner_b.x).abs(),
            height,
            (corner_a.z - corner_b.z).abs(),
        );
        Self { position, scale }
    }

    /// Turn the draft into a mark with default trigger settings.
    pub fn into_mark(self, label: impl Into<String>) -> Mark {
        Mark::new(label, self.position, self.scale)
    }
}

/// Margin and angle values parsed from the editing form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerEdit {
    pub margin: f32,
    pub angle1: f32,
    pub angle2: f32,
}

impl Default for TriggerEdit {
    fn default() -> Self {
        Self {
            margin: MarkDefaults::MARGIN,
            angle1: MarkDefaults::ANGLE1,
            angle2: MarkDefaults::ANGLE2,
        }
    }
}

impl TriggerEdit {
    /// Parse raw form input. Missing or unparseable fields fall back to [`MarkDefaults`].
    pub fn parse(margin: Option<&str>, angle1: Option<&str>, angle2: Option<&str>) -> Self {
        let margin = parse_or_default("margin", margin, MarkDefaults::MARGIN);
        Self {
            margin: if margin < 0.0 {
                warn!(margin, "negative margin entered, clamping to 0");
                0.0
            } else {
                margin
            },
            angle1: parse_or_default("angle1", angle1, MarkDefaults::ANGLE1),
            angle2: parse_or_default("angle2", angle2, MarkDefaults::ANGLE2),
        }
    }

    /// Write the edit into a mark.
    pub fn apply_to(&self, mark: &mut Mark) {
        mark.set_margin(self.margin);
        mark.angle1 = self.angle1;
        mark.angle2 = self.angle2;
    }
}

fn parse_or_default(field: &str, raw: Option<&str>, default: f32) -> f32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };

    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(field, input = raw, default, "invalid number, using default");
            default
        }
    }
}
