//! Detection profiles for the supported optical test systems.
//!
//! A [`DetectionProfile`] is built once per test-system selection:
//! base defaults, then the system's override patch, then (optionally) a
//! specialization patch keyed by a rig tag, then normalization. Profiles
//! are plain immutable data afterwards.
//!
//! ```
//! use featurefinder_profile::{DetectionProfile, Pivot, TestSystem};
//!
//! let profile = DetectionProfile::for_system(TestSystem::Galileo, Some("BAT"));
//! assert_eq!(profile.default_pivot(), Pivot::ImageCenter);
//! assert_eq!(profile.gauss_kernel() % 2, 1);
//! ```

mod catalog;
mod error;
mod params;
mod profile;

pub use catalog::{CatalogEntry, ProfileCatalog, TestSystem};
pub use error::ProfileError;
pub use params::{Orientation, Pivot, SizeRange};
pub use profile::{DetectionProfile, ProfileOverrides};
