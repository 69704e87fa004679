//! Compass-relative direction classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{horizontal, ZERO_LENGTH_EPSILON};

/// Width of one direction sector, in degrees.
pub const SECTOR_WIDTH: f32 = 45.0;

/// Where a target lies relative to the probe's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Forward,
    ForwardRight,
    Right,
    BackwardRight,
    Backward,
    BackwardLeft,
    Left,
    ForwardLeft,
    /// The target coincides with the probe.
    Here,
}

impl Sector {
    /// The eight directional sectors in clockwise order starting at Forward.
    pub const CLOCKWISE: [Sector; 8] = [
        Sector::Forward,
        Sector::ForwardRight,
        Sector::Right,
        Sector::BackwardRight,
        Sector::Backward,
        Sector::BackwardLeft,
        Sector::Left,
        Sector::ForwardLeft,
    ];

    /// Map a relative bearing in degrees to its sector.
    ///
    /// Sectors are centered on multiples of 45 degrees and half-open, so 22.5 already
    /// belongs to [`Sector::ForwardRight`].
    pub fn from_relative_bearing(bearing: f32) -> Self {
        let bearing = bearing.rem_euclid(360.0);
        let index = ((bearing + SECTOR_WIDTH / 2.0) / SECTOR_WIDTH).floor() as usize % 8;
        Self::CLOCKWISE[index]
    }

    /// Lowercase phrase used in narration text.
    pub fn phrase(&self) -> &'static str {
        match self {
            Sector::Forward => "forward",
            Sector::ForwardRight => "forward-right",
            Sector::Right => "right",
            Sector::BackwardRight => "backward-right",
            Sector::Backward => "backward",
            Sector::BackwardLeft => "backward-left",
            Sector::Left => "left",
            Sector::ForwardLeft => "forward-left",
            Sector::Here => "here",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Absolute bearing of a horizontal vector in degrees, 0 at world +Z, 90 at +X.
pub fn bearing_degrees(v: Vec3) -> f32 {
    v.x.atan2(v.z).to_degrees()
}

/// Classify `offset` (probe to target) relative to a probe facing `facing_degrees`.
pub fn classify(offset: Vec3, facing_degrees: f32) -> Sector {
    let flat = horizontal(offset);
    let length = flat.length();
    if length.is_nan() || length < ZERO_LENGTH_EPSILON {
        return Sector::Here;
    }

    let relative = bearing_degrees(flat.normalize()) - facing_degrees;
    if !relative.is_finite() {
        return Sector::Here;
    }
    Sector::from_relative_bearing(relative)
}
