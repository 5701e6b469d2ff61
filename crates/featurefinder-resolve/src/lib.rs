//! Fiducial reference resolution.
//!
//! Design idea:
//! - Take raw fiducial candidates from an external circle detector.
//! - Collapse duplicates that sit within the profile's deviation cutoff.
//! - Drop candidates with the wrong size or roundness.
//! - With three fiducials, verify the triangle they span.
//! - Label each survivor Left / Right / Unmatched by its angle around the
//!   pivot, after applying the per-eye flip/rotation.

mod assign;
mod dedup;
mod error;
mod filter;
mod resolver;
mod topology;
mod types;

pub use assign::{expected_slot_angles, SLOT_BASE_ANGLES};
pub use dedup::deduplicate;
pub use error::ResolveError;
pub use filter::{filter_secondary_features, passes_shape_gate};
pub use resolver::ReferenceResolver;
pub use topology::check_triangle;
pub use types::{
    DetectionCandidate, FeatureCandidate, ReferenceLabel, ResolveReport, ResolvedReference,
};
