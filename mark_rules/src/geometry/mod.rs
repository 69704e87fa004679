//! Region evaluation: footprint containment, trigger regions, and nearest-mark resolution.
//!
//! All functions here are total. A mark that is not [well formed](Mark::is_well_formed)
//! never contains any point, and NaN input never matches.
//!
//! Rectangle tests run on world X/Z axes around the mark's base center. The mark's yaw
//! only orients the angular sector.

mod direction;

pub use direction::*;

use glam::Vec3;

use crate::marks::Mark;

/// Tolerance for rectangle boundary comparisons, in world units.
pub const RECT_EPSILON: f32 = 1e-6;

/// Tolerance for angular sector comparisons, in degrees.
pub const ANGLE_EPSILON: f32 = 1e-3;

/// Horizontal offsets shorter than this are treated as zero-length.
pub const ZERO_LENGTH_EPSILON: f32 = 1e-5;

/// Drop the vertical component of a vector.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Strict footprint test, ignoring margin and angles.
pub fn is_inside_footprint(point: Vec3, mark: &Mark) -> bool {
    if !mark.is_well_formed() {
        return false;
    }
    let (half_x, half_z) = mark.half_extents();
    within_rect(point, mark, half_x, half_z)
}

/// Trigger region test: footprint expanded by the margin, gated by the angular sector.
///
/// Points inside the unexpanded footprint always belong to the trigger region; the
/// sector only restricts the margin band around it.
pub fn is_in_trigger_region(point: Vec3, mark: &Mark) -> bool {
    if !mark.is_well_formed() {
        return false;
    }

    let (half_x, half_z) = mark.half_extents();
    if within_rect(point, mark, half_x, half_z) {
        return true;
    }

    let margin = mark.effective_margin();
    if !within_rect(point, mark, half_x + margin, half_z + margin) {
        return false;
    }

    is_within_sector(point, mark)
}

/// Angular sector stage of the trigger test.
///
/// The bearing from the mark's base center to `point` is measured against the mark's
/// forward direction and must lie within `[angle1, angle2]` (after sorting).
pub fn is_within_sector(point: Vec3, mark: &Mark) -> bool {
    let to_point = horizontal(point - mark.base_center());
    if to_point.length() < ZERO_LENGTH_EPSILON {
        return true;
    }

    let (lo, hi) = mark.sorted_angles();
    if hi - lo >= 360.0 - ANGLE_EPSILON {
        return true;
    }

    let angle = signed_angle_degrees(mark.forward(), to_point.normalize());
    angle >= lo - ANGLE_EPSILON && angle <= hi + ANGLE_EPSILON
}

/// Signed horizontal angle from `from` to `to`, in degrees within `(-180, 180]`.
///
/// Positive angles turn from +Z towards +X, matching the bearing convention of
/// [`classify`].
pub fn signed_angle_degrees(from: Vec3, to: Vec3) -> f32 {
    let cross_y = from.z * to.x - from.x * to.z;
    let dot = from.x * to.x + from.z * to.z;
    cross_y.atan2(dot).to_degrees()
}

/// Squared horizontal distance from `point` to the mark's base center.
pub fn horizontal_distance_squared(point: Vec3, mark: &Mark) -> f32 {
    horizontal(point - mark.base_center()).length_squared()
}

/// Pick the closest mark whose trigger region contains `point`.
///
/// Ties keep the first candidate encountered.
pub fn resolve_nearest<'a, I>(candidates: I, point: Vec3) -> Option<&'a Mark>
where
    I: IntoIterator<Item = &'a Mark>,
{
    let mut nearest: Option<(&'a Mark, f32)> = None;

    for mark in candidates {
        if !is_in_trigger_region(point, mark) {
            continue;
        }
        let distance = horizontal_distance_squared(point, mark);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((mark, distance)),
        }
    }

    nearest.map(|(mark, _)| mark)
}

fn within_rect(point: Vec3, mark: &Mark, half_x: f32, half_z: f32) -> bool {
    let offset = point - mark.base_center();
    offset.x.abs() <= half_x + RECT_EPSILON && offset.z.abs() <= half_z + RECT_EPSILON
}
