use featurefinder_core::Point;
use serde::{Deserialize, Serialize};

use crate::params::{Orientation, Pivot, SizeRange};

/// Relative band accepted around the expected fiducial triangle area.
const DEFAULT_TRIANGLE_AREA_TOLERANCE: f64 = 0.10;
/// Max lateral offset of a candidate from its slot ray, in field degrees.
const DEFAULT_REFERENCE_TOLERANCE_DEG: f64 = 10.0;

/// Fiducial detection and reference-matching parameters for one test system.
///
/// Every constructor runs normalization, so the following always hold:
/// - `gauss_kernel` is odd and at least 1;
/// - `circle_size.max <= rect_size.min` (a fiducial never exceeds the
///   enclosing feature size), with `circle_size.min` reset to 0 if the clamp
///   inverted the range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectionProfile {
    test_system: Option<String>,
    specialization: Option<String>,
    circle_size: SizeRange,
    circularity_min: f64,
    default_pivot: Pivot,
    deviation_cutoff_px: f64,
    gauss_kernel: u32,
    hough_min_length_px: f64,
    rect_size: SizeRange,
    threshold_edge: u32,
    angle_to_pixel_ratio: f64,
    default_clock_angle_deg: f64,
    fiducial_triangle_area: f64,
    triangle_area_tolerance: f64,
    reference_tolerance_deg: f64,
    orientation_left: Orientation,
    orientation_right: Orientation,
}

impl Default for DetectionProfile {
    fn default() -> Self {
        let mut profile = Self {
            test_system: None,
            specialization: None,
            circle_size: SizeRange::new(1000.0, 6000.0),
            circularity_min: 0.8,
            default_pivot: Pivot::Explicit(Point::new(1800.0, 1050.0)),
            deviation_cutoff_px: 100.0,
            gauss_kernel: 11,
            hough_min_length_px: 30.0,
            rect_size: SizeRange::new(10000.0, 30000.0),
            threshold_edge: 30,
            angle_to_pixel_ratio: 65.0,
            default_clock_angle_deg: 0.0,
            fiducial_triangle_area: 0.0,
            triangle_area_tolerance: DEFAULT_TRIANGLE_AREA_TOLERANCE,
            reference_tolerance_deg: DEFAULT_REFERENCE_TOLERANCE_DEG,
            orientation_left: Orientation::IDENTITY,
            orientation_right: Orientation::IDENTITY,
        };
        profile.normalize();
        profile
    }
}

impl DetectionProfile {
    /// A copy of this profile with `patch` applied and normalization re-run.
    pub fn with_overrides(&self, patch: &ProfileOverrides) -> Self {
        let mut profile = self.clone();
        patch.apply(&mut profile);
        profile.normalize();
        profile
    }

    /// Base defaults, then `system` patch, then an optional specialization.
    ///
    /// Both patches are applied before a single normalization pass.
    pub(crate) fn assemble(
        system: &str,
        system_patch: &ProfileOverrides,
        specialization: Option<(&str, &ProfileOverrides)>,
    ) -> Self {
        let mut profile = Self::default();
        system_patch.apply(&mut profile);
        profile.test_system = Some(system.to_owned());
        if let Some((tag, patch)) = specialization {
            patch.apply(&mut profile);
            profile.specialization = Some(tag.to_owned());
        }
        profile.normalize();
        profile
    }

    fn normalize(&mut self) {
        self.gauss_kernel = odd_kernel(i64::from(self.gauss_kernel));
        self.circle_size = clamp_fiducial_size(self.circle_size, self.rect_size);
    }

    pub fn test_system(&self) -> Option<&str> {
        self.test_system.as_deref()
    }

    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    /// Valid fiducial blob area, px².
    pub fn circle_size(&self) -> SizeRange {
        self.circle_size
    }

    pub fn circularity_min(&self) -> f64 {
        self.circularity_min
    }

    pub fn default_pivot(&self) -> Pivot {
        self.default_pivot
    }

    /// Two detections closer than this are the same physical fiducial.
    pub fn deviation_cutoff_px(&self) -> f64 {
        self.deviation_cutoff_px
    }

    pub fn gauss_kernel(&self) -> u32 {
        self.gauss_kernel
    }

    pub fn hough_min_length_px(&self) -> f64 {
        self.hough_min_length_px
    }

    /// Valid non-fiducial feature area, px².
    pub fn rect_size(&self) -> SizeRange {
        self.rect_size
    }

    pub fn threshold_edge(&self) -> u32 {
        self.threshold_edge
    }

    /// Pixels per degree of field angle.
    pub fn angle_to_pixel_ratio(&self) -> f64 {
        self.angle_to_pixel_ratio
    }

    pub fn default_clock_angle_deg(&self) -> f64 {
        self.default_clock_angle_deg
    }

    /// Expected area (px²) of the fiducial triangle; `0` disables the check.
    ///
    /// The built-in test-system values (9.8 to 59.3) are tiny next to any
    /// real three-fiducial layout, so with them only near-degenerate
    /// triangles pass. Tune the value through a [`ProfileCatalog`] entry
    /// before relying on the check.
    ///
    /// [`ProfileCatalog`]: crate::ProfileCatalog
    pub fn fiducial_triangle_area(&self) -> f64 {
        self.fiducial_triangle_area
    }

    pub fn triangle_area_tolerance(&self) -> f64 {
        self.triangle_area_tolerance
    }

    pub fn reference_tolerance_deg(&self) -> f64 {
        self.reference_tolerance_deg
    }

    /// Lateral slot tolerance converted to pixels.
    pub fn reference_tolerance_px(&self) -> f64 {
        self.reference_tolerance_deg * self.angle_to_pixel_ratio
    }

    pub fn orientation_left(&self) -> Orientation {
        self.orientation_left
    }

    pub fn orientation_right(&self) -> Orientation {
        self.orientation_right
    }
}

/// Partial profile: every set field replaces the profile's value.
///
/// This is the unit of both the built-in per-system catalog and
/// externalized JSON catalogs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle_size: Option<SizeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circularity_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pivot: Option<Pivot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation_cutoff_px: Option<f64>,
    /// Raw kernel size; negative or even values are fixed up on build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_kernel: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hough_min_length_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_size: Option<SizeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_edge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_to_pixel_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_clock_angle_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiducial_triangle_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triangle_area_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_tolerance_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_left: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_right: Option<Orientation>,
}

impl ProfileOverrides {
    fn apply(&self, p: &mut DetectionProfile) {
        if let Some(v) = self.circle_size {
            p.circle_size = v;
        }
        if let Some(v) = self.circularity_min {
            p.circularity_min = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.default_pivot {
            p.default_pivot = v;
        }
        if let Some(v) = self.deviation_cutoff_px {
            p.deviation_cutoff_px = v;
        }
        if let Some(v) = self.gauss_kernel {
            p.gauss_kernel = odd_kernel(v);
        }
        if let Some(v) = self.hough_min_length_px {
            p.hough_min_length_px = v;
        }
        if let Some(v) = self.rect_size {
            p.rect_size = v;
        }
        if let Some(v) = self.threshold_edge {
            p.threshold_edge = v;
        }
        if let Some(v) = self.angle_to_pixel_ratio {
            p.angle_to_pixel_ratio = v;
        }
        if let Some(v) = self.default_clock_angle_deg {
            p.default_clock_angle_deg = v;
        }
        if let Some(v) = self.fiducial_triangle_area {
            p.fiducial_triangle_area = v;
        }
        if let Some(v) = self.triangle_area_tolerance {
            p.triangle_area_tolerance = v.abs();
        }
        if let Some(v) = self.reference_tolerance_deg {
            p.reference_tolerance_deg = v.abs();
        }
        if let Some(v) = self.orientation_left {
            p.orientation_left = v;
        }
        if let Some(v) = self.orientation_right {
            p.orientation_right = v;
        }
    }
}

/// Force a kernel size to be odd and at least 1.
fn odd_kernel(val: i64) -> u32 {
    let k = if val < 0 {
        1
    } else if val % 2 == 0 {
        val + 1
    } else {
        val
    };
    u32::try_from(k).unwrap_or(u32::MAX)
}

/// Keep fiducials no larger than the smallest valid enclosing feature.
fn clamp_fiducial_size(circle: SizeRange, rect: SizeRange) -> SizeRange {
    if circle.max <= rect.min {
        return circle;
    }
    let max = rect.min;
    let min = if circle.min > max { 0.0 } else { circle.min };
    SizeRange { min, max }
}
