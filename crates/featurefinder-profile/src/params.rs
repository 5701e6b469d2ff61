use featurefinder_core::{normalize_angle_deg, Point};
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range of a size metric (px² for areas, px for lengths).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range with a non-positive upper bound does not gate anything.
    pub fn is_disabled(&self) -> bool {
        self.max <= 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.is_disabled() || (value >= self.min && value <= self.max)
    }

    /// Middle of the range, the "expected" size of a valid detection.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }
}

/// Origin used when measuring reference angles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// Geometric center of the image, supplied by the caller.
    ImageCenter,
    /// Fixed pixel position.
    Explicit(Point),
}

impl Pivot {
    /// Resolve to a concrete point given the image center.
    pub fn resolve(&self, image_center: Point) -> Point {
        match self {
            Pivot::ImageCenter => image_center,
            Pivot::Explicit(p) => *p,
        }
    }
}

/// Per-eye image transform: mirror flags followed by a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub flip_x: bool,
    pub flip_y: bool,
    pub rotation_deg: f64,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation::new(false, false, 0.0);

    pub const fn new(flip_x: bool, flip_y: bool, rotation_deg: f64) -> Self {
        Self {
            flip_x,
            flip_y,
            rotation_deg,
        }
    }

    /// Map a direction (degrees) through this transform.
    ///
    /// `flip_x` mirrors across the vertical axis, `flip_y` across the
    /// horizontal axis; the rotation is applied last.
    pub fn apply_deg(&self, angle: f64) -> f64 {
        let mut a = angle;
        if self.flip_x {
            a = 180.0 - a;
        }
        if self.flip_y {
            a = -a;
        }
        normalize_angle_deg(a + self.rotation_deg)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
