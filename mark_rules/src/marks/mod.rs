//! Mark definitions for the map.

mod draft;

pub use draft::*;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default editing values applied when an operator leaves a field blank or types garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkDefaults;

impl MarkDefaults {
    pub const MARGIN: f32 = 1.0;
    pub const ANGLE1: f32 = -30.0;
    pub const ANGLE2: f32 = 30.0;
}

/// A named rectangular region of interest painted over the map.
///
/// `position` is the vertical midpoint of the mark; the ground-contact point is
/// [`Mark::base_center`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub label: String,
    pub position: Vec3,
    /// Width (x), height (y) and depth (z) of the footprint.
    pub scale: Vec3,
    /// Rotation about world up in degrees. 0 faces world +Z, 90 faces +X.
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Horizontal expansion of the footprint that forms the "near" region.
    pub margin: f32,
    pub angle1: f32,
    pub angle2: f32,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub details: String,
}

impl Mark {
    /// Create a new mark with default margin and angles.
    pub fn new(label: impl Into<String>, position: Vec3, scale: Vec3) -> Self {
        Self {
            label: label.into(),
            position,
            scale,
            yaw_degrees: 0.0,
            margin: MarkDefaults::MARGIN,
            angle1: MarkDefaults::ANGLE1,
            angle2: MarkDefaults::ANGLE2,
            keyword: String::new(),
            details: String::new(),
        }
    }

    /// Set the trigger margin. Negative values clamp to zero.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.set_margin(margin);
        self
    }

    /// Set the angular sector, in degrees relative to the mark's forward direction.
    pub fn with_angles(mut self, angle1: f32, angle2: f32) -> Self {
        self.angle1 = angle1;
        self.angle2 = angle2;
        self
    }

    /// Set the mark's yaw in degrees.
    pub fn with_yaw(mut self, yaw_degrees: f32) -> Self {
        self.yaw_degrees = yaw_degrees;
        self
    }

    /// Set the keyword used in narration prompts.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Set the free-text details used in narration prompts.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Set the trigger margin, clamping negative and non-finite input to zero.
    pub fn set_margin(&mut self, margin: f32) {
        if margin.is_finite() && margin >= 0.0 {
            self.margin = margin;
        } else {
            warn!(label = %self.label, margin, "margin must be non-negative, clamping to 0");
            self.margin = 0.0;
        }
    }

    /// Margin as the evaluator uses it: never negative, never NaN.
    pub fn effective_margin(&self) -> f32 {
        if self.margin.is_finite() {
            self.margin.max(0.0)
        } else {
            0.0
        }
    }

    /// The ground-contact point below the mark's vertical midpoint.
    pub fn base_center(&self) -> Vec3 {
        self.position - Vec3::Y * (self.scale.y / 2.0)
    }

    /// Unit forward vector in the horizontal plane.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_degrees.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Horizontal half extents (x, z) of the unexpanded footprint.
    pub fn half_extents(&self) -> (f32, f32) {
        (self.scale.x / 2.0, self.scale.z / 2.0)
    }

    /// The angular sector with `angle1 <= angle2`.
    pub fn sorted_angles(&self) -> (f32, f32) {
        if self.angle1 <= self.angle2 {
            (self.angle1, self.angle2)
        } else {
            (self.angle2, self.angle1)
        }
    }

    /// Check that every scale component is finite and positive.
    ///
    /// Malformed marks never contain any point.
    pub fn is_well_formed(&self) -> bool {
        self.position.is_finite()
            && self.scale.is_finite()
            && self.scale.x > 0.0
            && self.scale.y > 0.0
            && self.scale.z > 0.0
    }
}
