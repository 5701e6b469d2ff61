use featurefinder_core::{
    angle_deg, angle_diff_deg, distance, nearest_point, normalize_angle_deg, Point,
};
use featurefinder_profile::DetectionProfile;

use crate::error::ResolveError;
use crate::types::ReferenceLabel;

/// Untransformed slot directions: left of the pivot and right of it.
pub const SLOT_BASE_ANGLES: [(ReferenceLabel, f64); 2] =
    [(ReferenceLabel::Left, 180.0), (ReferenceLabel::Right, 0.0)];

/// Slot directions after the per-eye orientation and the clock angle.
pub fn expected_slot_angles(profile: &DetectionProfile) -> [(ReferenceLabel, f64); 2] {
    let clock = profile.default_clock_angle_deg();
    let [(left, left_base), (right, right_base)] = SLOT_BASE_ANGLES;
    [
        (
            left,
            normalize_angle_deg(profile.orientation_left().apply_deg(left_base) + clock),
        ),
        (
            right,
            normalize_angle_deg(profile.orientation_right().apply_deg(right_base) + clock),
        ),
    ]
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SlotAssignment {
    pub label: ReferenceLabel,
    pub angle_deg: f64,
    pub offset_px: f64,
}

#[derive(Clone, Copy, Debug)]
struct Polar {
    angle_deg: f64,
    /// Index into the slot table of the slot with the nearest direction.
    slot: usize,
    offset_px: f64,
    eligible: bool,
}

fn unit(angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(rad.cos(), rad.sin())
}

/// Label each point with at most one point per slot.
///
/// Every point prefers the slot whose expected direction is nearest
/// (left wins exact ties). It is eligible for that slot when it lies on the
/// slot's side of the pivot and within the profile's lateral tolerance.
/// Each slot then takes its eligible point with the nearest direction;
/// the rest are unmatched.
pub(crate) fn assign_slots(
    points: &[Point],
    pivot: Point,
    profile: &DetectionProfile,
) -> Result<Vec<SlotAssignment>, ResolveError> {
    let slots = expected_slot_angles(profile);
    let tolerance_px = profile.reference_tolerance_px();

    let polar: Vec<Polar> = points
        .iter()
        .map(|p| {
            let angle = angle_deg(&pivot, p);
            let radius = distance(&pivot, p);
            let slot = if angle_diff_deg(slots[1].1, angle) < angle_diff_deg(slots[0].1, angle) {
                1
            } else {
                0
            };
            let delta = normalize_angle_deg(angle - slots[slot].1).to_radians();
            let offset_px = radius * delta.sin();
            Polar {
                angle_deg: angle,
                slot,
                offset_px,
                eligible: delta.cos() >= 0.0 && offset_px.abs() <= tolerance_px,
            }
        })
        .collect();

    let mut labels = vec![ReferenceLabel::Unmatched; points.len()];
    for (slot_idx, &(label, expected)) in slots.iter().enumerate() {
        let members: Vec<usize> = polar
            .iter()
            .enumerate()
            .filter(|(_, p)| p.slot == slot_idx && p.eligible)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        let directions: Vec<Point> = members.iter().map(|&i| unit(polar[i].angle_deg)).collect();
        let (best, _) = nearest_point(&unit(expected), &directions)?;
        labels[members[best]] = label;
    }

    Ok(polar
        .iter()
        .zip(labels)
        .map(|(p, label)| SlotAssignment {
            label,
            angle_deg: p.angle_deg,
            offset_px: p.offset_px,
        })
        .collect())
}
