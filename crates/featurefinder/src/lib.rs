//! High-level facade crate for the `featurefinder-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the profile and resolver crates
//! - [`pipeline::DetectionPipeline`], which picks a test-system profile and
//!   resolves externally detected fiducial candidates into left/right
//!   reference points
//! - (feature `image`) an adapter filling [`core::ImageArtifacts`] from the
//!   `image` crate
//!
//! ## Quickstart
//!
//! ```
//! use featurefinder::pipeline::DetectionPipeline;
//! use featurefinder::resolve::DetectionCandidate;
//! use featurefinder::core::Point;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let candidates = vec![
//!     DetectionCandidate::new(Point::new(1500.0, 1100.0), 3000.0, 0.9),
//!     DetectionCandidate::new(Point::new(2300.0, 1100.0), 3000.0, 0.9),
//! ];
//! let pipeline = DetectionPipeline::new();
//! let refs = pipeline.resolve("galileo", Some("BAT"), &candidates, Point::new(1900.0, 1100.0))?;
//! println!("resolved {} references", refs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `featurefinder::core`: geometry helpers, image artifacts, logger.
//! - `featurefinder::profile`: detection profiles and the test-system catalog.
//! - `featurefinder::resolve`: deduplication, filtering and slot assignment.
//! - `featurefinder::pipeline`: profile selection + resolution in one call.
//! - `featurefinder::artifacts` (feature `image`): `image::DynamicImage` adapter.

pub use featurefinder_core as core;
pub use featurefinder_profile as profile;
pub use featurefinder_resolve as resolve;

pub use featurefinder_profile::{DetectionProfile, TestSystem};
pub use featurefinder_resolve::{DetectionCandidate, ReferenceLabel, ResolvedReference};

#[cfg(feature = "image")]
pub mod artifacts;
pub mod pipeline;
