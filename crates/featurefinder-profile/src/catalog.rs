//! Built-in test-system catalog and externalized catalogs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use featurefinder_core::Point;
use log::debug;
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::ProfileError;
use crate::params::{Orientation, Pivot, SizeRange};
use crate::profile::{DetectionProfile, ProfileOverrides};

/// Optical test systems with a tuned detection profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSystem {
    /// Galileo 20° and 30° rigs.
    Galileo,
    Midas,
    Ml2,
    Hydra,
    /// TriOptics bench ("Olaf").
    TriOptics,
}

impl TestSystem {
    pub const ALL: [TestSystem; 5] = [
        TestSystem::Galileo,
        TestSystem::Midas,
        TestSystem::Ml2,
        TestSystem::Hydra,
        TestSystem::TriOptics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TestSystem::Galileo => "galileo",
            TestSystem::Midas => "midas",
            TestSystem::Ml2 => "ml2",
            TestSystem::Hydra => "hydra",
            TestSystem::TriOptics => "trioptics",
        }
    }

    /// Specialization tags this system knows about.
    pub fn specialization_tags(self) -> &'static [&'static str] {
        match self {
            TestSystem::Galileo => &["JOHNNY5", "BAT"],
            TestSystem::Midas => &["PIN"],
            TestSystem::Ml2 => &["TET"],
            TestSystem::Hydra | TestSystem::TriOptics => &[],
        }
    }

    /// Fields this system changes relative to the base profile.
    pub fn overrides(self) -> ProfileOverrides {
        match self {
            TestSystem::Galileo => ProfileOverrides {
                angle_to_pixel_ratio: Some(65.0),
                circle_size: Some(SizeRange::new(1000.0, 5000.0)),
                circularity_min: Some(0.7),
                default_clock_angle_deg: Some(-5.0),
                default_pivot: Some(Pivot::Explicit(Point::new(1900.0, 1100.0))),
                deviation_cutoff_px: Some(150.0),
                fiducial_triangle_area: Some(9.8),
                gauss_kernel: Some(1),
                hough_min_length_px: Some(50.0),
                orientation_left: Some(Orientation::IDENTITY),
                orientation_right: Some(Orientation::IDENTITY),
                rect_size: Some(SizeRange::new(10000.0, 50000.0)),
                threshold_edge: Some(10),
                ..ProfileOverrides::default()
            },
            TestSystem::Midas => ProfileOverrides {
                angle_to_pixel_ratio: Some(65.0),
                circle_size: Some(SizeRange::new(1000.0, 6000.0)),
                circularity_min: Some(0.8),
                default_clock_angle_deg: Some(-5.0),
                default_pivot: Some(Pivot::ImageCenter),
                deviation_cutoff_px: Some(200.0),
                fiducial_triangle_area: Some(11.8),
                gauss_kernel: Some(89),
                hough_min_length_px: Some(0.0),
                orientation_left: Some(Orientation::new(true, false, -90.0)),
                orientation_right: Some(Orientation::new(false, false, 90.0)),
                rect_size: Some(SizeRange::new(15000.0, 35000.0)),
                threshold_edge: Some(100),
                ..ProfileOverrides::default()
            },
            TestSystem::Ml2 => ProfileOverrides {
                angle_to_pixel_ratio: Some(80.0),
                circle_size: Some(SizeRange::new(1000.0, 10000.0)),
                circularity_min: Some(0.2),
                default_clock_angle_deg: Some(-5.0),
                default_pivot: Some(Pivot::ImageCenter),
                deviation_cutoff_px: Some(150.0),
                fiducial_triangle_area: Some(58.3),
                gauss_kernel: Some(1),
                orientation_left: Some(Orientation::new(false, true, 90.0)),
                orientation_right: Some(Orientation::new(true, true, 90.0)),
                rect_size: Some(SizeRange::new(10000.0, 50000.0)),
                threshold_edge: Some(30),
                ..ProfileOverrides::default()
            },
            TestSystem::Hydra => ProfileOverrides {
                angle_to_pixel_ratio: Some(78.0),
                circle_size: Some(SizeRange::new(0.0, 0.0)),
                circularity_min: Some(0.0),
                default_clock_angle_deg: Some(0.0),
                default_pivot: Some(Pivot::ImageCenter),
                deviation_cutoff_px: Some(200.0),
                fiducial_triangle_area: Some(0.0),
                gauss_kernel: Some(21),
                hough_min_length_px: Some(15.0),
                orientation_left: Some(Orientation::IDENTITY),
                orientation_right: Some(Orientation::IDENTITY),
                rect_size: Some(SizeRange::new(10000.0, 30000.0)),
                threshold_edge: Some(30),
                ..ProfileOverrides::default()
            },
            TestSystem::TriOptics => ProfileOverrides {
                default_pivot: Some(Pivot::ImageCenter),
                deviation_cutoff_px: Some(250.0),
                gauss_kernel: Some(1),
                hough_min_length_px: Some(500.0),
                orientation_left: Some(Orientation::IDENTITY),
                orientation_right: Some(Orientation::IDENTITY),
                threshold_edge: Some(10),
                ..ProfileOverrides::default()
            },
        }
    }

    /// Second-level patch for a rig variant; `None` for tags not on the
    /// system's whitelist.
    pub fn specialization(self, tag: &str) -> Option<ProfileOverrides> {
        let tag = tag.trim().to_ascii_uppercase();
        let patch = match (self, tag.as_str()) {
            (TestSystem::Galileo, "JOHNNY5") => ProfileOverrides {
                hough_min_length_px: Some(40.0),
                ..ProfileOverrides::default()
            },
            (TestSystem::Galileo, "BAT") => ProfileOverrides {
                default_pivot: Some(Pivot::ImageCenter),
                orientation_right: Some(Orientation::new(true, false, 0.0)),
                ..ProfileOverrides::default()
            },
            (TestSystem::Midas, "PIN") => ProfileOverrides {
                angle_to_pixel_ratio: Some(80.0),
                circle_size: Some(SizeRange::new(1000.0, 10000.0)),
                circularity_min: Some(0.3),
                default_clock_angle_deg: Some(0.0),
                fiducial_triangle_area: Some(12.4),
                gauss_kernel: Some(201),
                orientation_left: Some(Orientation::new(true, false, 0.0)),
                orientation_right: Some(Orientation::new(true, true, 0.0)),
                ..ProfileOverrides::default()
            },
            (TestSystem::Ml2, "TET") => ProfileOverrides {
                angle_to_pixel_ratio: Some(65.0),
                fiducial_triangle_area: Some(59.3),
                orientation_left: Some(Orientation::new(false, false, 90.0)),
                orientation_right: Some(Orientation::new(false, false, 90.0)),
                ..ProfileOverrides::default()
            },
            _ => return None,
        };
        Some(patch)
    }
}

impl fmt::Display for TestSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestSystem {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "galileo" => Ok(TestSystem::Galileo),
            "midas" => Ok(TestSystem::Midas),
            "ml2" => Ok(TestSystem::Ml2),
            "hydra" => Ok(TestSystem::Hydra),
            "trioptics" | "olaf" => Ok(TestSystem::TriOptics),
            _ => Err(ProfileError::UnknownTestSystem(s.to_owned())),
        }
    }
}

impl DetectionProfile {
    /// Build the tuned profile for `system`, optionally specialized for a
    /// rig variant.
    ///
    /// Unknown tags are ignored: specialization is best-effort tuning.
    pub fn for_system(system: TestSystem, tag: Option<&str>) -> Self {
        let patch = system.overrides();
        let special = tag.and_then(|t| match system.specialization(t) {
            Some(p) => Some((t, p)),
            None => {
                debug!("no `{t}` specialization for {system}; using base profile");
                None
            }
        });
        DetectionProfile::assemble(
            system.name(),
            &patch,
            special.as_ref().map(|(t, p)| (*t, p)),
        )
    }
}

/// Overrides for one test system plus its tagged specializations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogEntry {
    pub overrides: ProfileOverrides,
    pub specializations: BTreeMap<String, ProfileOverrides>,
}

/// Key → override mapping of test systems, loadable from JSON.
///
/// ```json
/// {
///   "galileo": {
///     "overrides": { "deviation_cutoff_px": 150.0 },
///     "specializations": { "BAT": { "default_pivot": "image_center" } }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCatalog {
    systems: BTreeMap<String, CatalogEntry>,
}

impl ProfileCatalog {
    /// The compiled-in catalog for every [`TestSystem`].
    pub fn builtin() -> Self {
        let systems = TestSystem::ALL
            .iter()
            .map(|&system| {
                let specializations = system
                    .specialization_tags()
                    .iter()
                    .filter_map(|&tag| Some((tag.to_owned(), system.specialization(tag)?)))
                    .collect();
                let entry = CatalogEntry {
                    overrides: system.overrides(),
                    specializations,
                };
                (system.name().to_owned(), entry)
            })
            .collect();
        Self { systems }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Add or replace a system entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: CatalogEntry) {
        self.systems.insert(name.into(), entry);
    }

    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.keys().map(String::as_str)
    }

    /// Look up an entry by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<(&str, &CatalogEntry)> {
        let name = name.trim();
        self.systems
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Build a normalized profile for `name`, specialized by `tag` when the
    /// entry lists it.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn build(&self, name: &str, tag: Option<&str>) -> Result<DetectionProfile, ProfileError> {
        let (key, entry) = self
            .get(name)
            .ok_or_else(|| ProfileError::UnknownTestSystem(name.to_owned()))?;
        let special = tag.and_then(|t| {
            let found = entry
                .specializations
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(t.trim()));
            if found.is_none() {
                debug!("no `{t}` specialization for {key}; using base profile");
            }
            found
        });
        Ok(DetectionProfile::assemble(
            key,
            &entry.overrides,
            special.map(|(k, p)| (k.as_str(), p)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_profile_is_normalized() {
        for system in TestSystem::ALL {
            let tags = std::iter::once(None).chain(system.specialization_tags().iter().map(Some));
            for tag in tags {
                let p = DetectionProfile::for_system(system, tag.copied());
                assert_eq!(p.gauss_kernel() % 2, 1, "{system} {tag:?}");
                assert!(p.circle_size().max <= p.rect_size().min, "{system} {tag:?}");
                assert_eq!(p.test_system(), Some(system.name()));
            }
        }
    }

    #[test]
    fn galileo_specializations() {
        let base = DetectionProfile::for_system(TestSystem::Galileo, None);
        assert_eq!(base.hough_min_length_px(), 50.0);
        assert_eq!(
            base.default_pivot(),
            Pivot::Explicit(Point::new(1900.0, 1100.0))
        );
        assert_eq!(base.specialization(), None);

        let johnny = DetectionProfile::for_system(TestSystem::Galileo, Some("JOHNNY5"));
        assert_eq!(johnny.hough_min_length_px(), 40.0);
        assert_eq!(johnny.specialization(), Some("JOHNNY5"));

        let bat = DetectionProfile::for_system(TestSystem::Galileo, Some("bat"));
        assert_eq!(bat.default_pivot(), Pivot::ImageCenter);
        assert_eq!(bat.orientation_right(), Orientation::new(true, false, 0.0));
        assert_eq!(bat.orientation_left(), Orientation::IDENTITY);
    }

    #[test]
    fn unknown_tag_is_a_noop() {
        let base = DetectionProfile::for_system(TestSystem::Midas, None);
        let unknown = DetectionProfile::for_system(TestSystem::Midas, Some("TET"));
        assert_eq!(base, unknown);
    }

    #[test]
    fn midas_pin_overrides_kernel_and_orientations() {
        let pin = DetectionProfile::for_system(TestSystem::Midas, Some("PIN"));
        assert_eq!(pin.gauss_kernel(), 201);
        assert_eq!(pin.circle_size(), SizeRange::new(1000.0, 10000.0));
        assert_eq!(pin.orientation_right(), Orientation::new(true, true, 0.0));
        assert_eq!(pin.default_clock_angle_deg(), 0.0);
        // Base Midas values survive where PIN does not override them.
        assert_eq!(pin.deviation_cutoff_px(), 200.0);
    }

    #[test]
    fn test_system_names_round_trip() {
        for system in TestSystem::ALL {
            assert_eq!(system.name().parse::<TestSystem>().ok(), Some(system));
        }
        assert_eq!("Olaf".parse::<TestSystem>().ok(), Some(TestSystem::TriOptics));
        assert!(matches!(
            "apollo".parse::<TestSystem>(),
            Err(ProfileError::UnknownTestSystem(_))
        ));
    }

    #[test]
    fn builtin_catalog_matches_direct_construction() {
        let catalog = ProfileCatalog::builtin();
        assert_eq!(catalog.system_names().count(), TestSystem::ALL.len());
        for system in TestSystem::ALL {
            for &tag in system.specialization_tags() {
                let from_catalog = catalog
                    .build(system.name(), Some(tag))
                    .expect("builtin system");
                assert_eq!(
                    from_catalog,
                    DetectionProfile::for_system(system, Some(tag))
                );
            }
        }
    }

    #[test]
    fn external_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{
                "bench-7": {{
                    "overrides": {{ "gauss_kernel": 8, "deviation_cutoff_px": 42.0 }},
                    "specializations": {{ "wide": {{ "angle_to_pixel_ratio": 30.0 }} }}
                }}
            }}"#
        )
        .expect("write catalog");

        let catalog = ProfileCatalog::from_path(file.path()).expect("valid catalog");
        let p = catalog.build("BENCH-7", Some("WIDE")).expect("known system");
        assert_eq!(p.gauss_kernel(), 9);
        assert_eq!(p.deviation_cutoff_px(), 42.0);
        assert_eq!(p.angle_to_pixel_ratio(), 30.0);
        assert_eq!(p.test_system(), Some("bench-7"));
        assert_eq!(p.specialization(), Some("wide"));

        assert!(matches!(
            catalog.build("galileo", None),
            Err(ProfileError::UnknownTestSystem(_))
        ));
    }

    #[test]
    fn inserted_system_builds_alongside_builtins() {
        let mut catalog = ProfileCatalog::builtin();
        let mut specializations = BTreeMap::new();
        specializations.insert(
            "FLIP".to_owned(),
            ProfileOverrides {
                orientation_left: Some(Orientation::new(true, false, 0.0)),
                ..ProfileOverrides::default()
            },
        );
        catalog.insert(
            "bench-3",
            CatalogEntry {
                overrides: ProfileOverrides {
                    default_pivot: Some(Pivot::ImageCenter),
                    gauss_kernel: Some(6),
                    ..ProfileOverrides::default()
                },
                specializations,
            },
        );
        assert_eq!(catalog.system_names().count(), TestSystem::ALL.len() + 1);

        let p = catalog.build("Bench-3", Some("flip")).expect("inserted system");
        assert_eq!(p.test_system(), Some("bench-3"));
        assert_eq!(p.specialization(), Some("FLIP"));
        assert_eq!(p.gauss_kernel(), 7);
        assert_eq!(p.default_pivot(), Pivot::ImageCenter);
        assert_eq!(p.orientation_left(), Orientation::new(true, false, 0.0));

        // Replacing an entry drops its old specializations.
        catalog.insert("bench-3", CatalogEntry::default());
        let plain = catalog.build("bench-3", Some("FLIP")).expect("replaced system");
        assert_eq!(plain.specialization(), None);
        assert_eq!(plain.gauss_kernel(), DetectionProfile::default().gauss_kernel());
        assert_eq!(plain.default_pivot(), DetectionProfile::default().default_pivot());
    }

    #[test]
    fn missing_catalog_file_reports_path() {
        let err = ProfileCatalog::from_path("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
