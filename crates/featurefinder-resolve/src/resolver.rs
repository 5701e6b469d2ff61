use featurefinder_core::Point;
use featurefinder_profile::DetectionProfile;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::assign::assign_slots;
use crate::dedup::deduplicate;
use crate::error::ResolveError;
use crate::filter::passes_shape_gate;
use crate::topology::check_triangle;
use crate::types::{DetectionCandidate, ResolveReport, ResolvedReference};

/// Resolves raw fiducial candidates into labeled reference points.
///
/// Each call is a pure function of the candidates, the profile and the
/// image center; a resolver can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct ReferenceResolver {
    profile: DetectionProfile,
}

impl ReferenceResolver {
    pub fn new(profile: DetectionProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DetectionProfile {
        &self.profile
    }

    /// Labeled references, one per surviving candidate, in input order.
    pub fn resolve(
        &self,
        candidates: &[DetectionCandidate],
        image_center: Point,
    ) -> Result<Vec<ResolvedReference>, ResolveError> {
        Ok(self.resolve_report(candidates, image_center)?.references)
    }

    /// Same as [`resolve`](Self::resolve) but keeps the intermediate counts.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, candidates),
            fields(num_candidates = candidates.len())
        )
    )]
    pub fn resolve_report(
        &self,
        candidates: &[DetectionCandidate],
        image_center: Point,
    ) -> Result<ResolveReport, ResolveError> {
        validate(candidates)?;
        let profile = &self.profile;

        let circle_size = profile.circle_size();
        let expected_size = (!circle_size.is_disabled()).then(|| circle_size.midpoint());
        let unique = deduplicate(candidates, profile.deviation_cutoff_px(), expected_size);
        let duplicates_removed = candidates.len() - unique.len();

        let survivors: Vec<usize> = unique
            .into_iter()
            .filter(|&i| passes_shape_gate(&candidates[i], profile))
            .collect();
        let rejected_by_shape = candidates.len() - duplicates_removed - survivors.len();
        debug!(
            "{} candidates: {duplicates_removed} duplicates, {rejected_by_shape} rejected by shape, {} kept",
            candidates.len(),
            survivors.len()
        );

        let points: Vec<Point> = survivors.iter().map(|&i| candidates[i].center).collect();
        let triangle_area = check_triangle(&points, profile)?;

        let pivot = profile.default_pivot().resolve(image_center);
        if !(pivot.x.is_finite() && pivot.y.is_finite()) {
            return Err(ResolveError::invalid(format!(
                "pivot ({}, {}) is not finite",
                pivot.x, pivot.y
            )));
        }

        let assignments = assign_slots(&points, pivot, profile)?;
        let references = survivors
            .iter()
            .zip(assignments)
            .map(|(&source_index, a)| ResolvedReference {
                label: a.label,
                point: candidates[source_index].center,
                source_index,
                angle_deg: a.angle_deg,
                offset_px: a.offset_px,
            })
            .collect();

        Ok(ResolveReport {
            references,
            pivot,
            duplicates_removed,
            rejected_by_shape,
            triangle_area,
        })
    }
}

fn validate(candidates: &[DetectionCandidate]) -> Result<(), ResolveError> {
    if candidates.is_empty() {
        return Err(ResolveError::invalid("no detection candidates"));
    }
    if let Some(idx) = candidates.iter().position(|c| !c.is_finite()) {
        return Err(ResolveError::invalid(format!(
            "candidate {idx} has non-finite coordinates or metrics"
        )));
    }
    Ok(())
}
