//! Observation - turns a probe sample and a set of candidate marks into a situation.
//!
//! The pipeline per tick:
//! 1. **Resolve**: pick the nearest mark whose trigger region contains the probe
//! 2. **Contain**: `Inside` if the probe is within its footprint, otherwise `Near`
//! 3. **Orient**: classify the mark's direction relative to the probe's facing

mod situation;

pub use situation::*;

use glam::Vec3;
use mark_rules::{classify, is_inside_footprint, resolve_nearest, Mark};
use serde::{Deserialize, Serialize};

/// A probe sample: where the player or cursor is, and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub position: Vec3,
    /// Facing in degrees, 0 at world +Z and 90 at +X.
    pub facing_degrees: f32,
}

impl Probe {
    /// Create a new probe at `position` facing `facing_degrees`.
    pub fn new(position: Vec3, facing_degrees: f32) -> Self {
        Self {
            position,
            facing_degrees,
        }
    }
}

/// Evaluate a probe against the candidate marks.
pub fn observe<'a, I>(probe: &Probe, candidates: I) -> Observation
where
    I: IntoIterator<Item = &'a Mark>,
{
    let Some(mark) = resolve_nearest(candidates, probe.position) else {
        return Observation::nothing();
    };

    let situation = if is_inside_footprint(probe.position, mark) {
        Situation::Inside
    } else {
        Situation::Near
    };
    let sector = classify(mark.base_center() - probe.position, probe.facing_degrees);

    Observation::of_mark(mark, situation, sector)
}
