//! Small pixel-space geometry kit.
//!
//! All angles are in degrees. Image coordinates are used as-is (y grows
//! downwards), so a positive angle points below the origin.

use crate::Point;

/// Errors produced by geometry queries.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("candidate point set is empty")]
    EmptyCandidates,
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    (p2 - p1).norm()
}

/// Midpoint of two points, truncated toward zero to whole pixels.
#[inline]
pub fn midpoint(p1: &Point, p2: &Point) -> Point {
    Point::new(
        ((p1.x + p2.x) / 2.0).trunc(),
        ((p1.y + p2.y) / 2.0).trunc(),
    )
}

/// Wrap an angle into `(-180, 180]`.
#[inline]
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Absolute shortest difference between two angles, in `[0, 180]`.
#[inline]
pub fn angle_diff_deg(a: f64, b: f64) -> f64 {
    normalize_angle_deg(b - a).abs()
}

/// Angle of the ray `p1 -> p2` in `(-180, 180]`.
///
/// Returns `0.0` for coincident points.
pub fn angle_deg(p1: &Point, p2: &Point) -> f64 {
    let d = p2 - p1;
    if d.x == 0.0 && d.y == 0.0 {
        return 0.0;
    }
    normalize_angle_deg(d.y.atan2(d.x).to_degrees())
}

/// Unsigned triangle area (shoelace formula).
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    0.5 * (ab.x * ac.y - ab.y * ac.x).abs()
}

/// Index and distance of the candidate closest to `query`.
///
/// Exact ties resolve to the lowest index so repeated runs on the same
/// input always pick the same candidate.
pub fn nearest_point(query: &Point, candidates: &[Point]) -> Result<(usize, f64), GeometryError> {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, distance(query, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(GeometryError::EmptyCandidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(distance(&a, &b), 5.0);
        assert_relative_eq!(distance(&b, &b), 0.0);

        assert_eq!(midpoint(&a, &b), Point::new(1.0, 2.0));
        assert_eq!(
            midpoint(&Point::new(-3.0, 0.0), &Point::new(0.0, 0.0)),
            Point::new(-1.0, 0.0)
        );
    }

    #[test]
    fn angle_follows_image_axes() {
        let o = Point::new(10.0, 10.0);
        assert_relative_eq!(angle_deg(&o, &Point::new(20.0, 10.0)), 0.0);
        assert_relative_eq!(angle_deg(&o, &Point::new(10.0, 20.0)), 90.0);
        assert_relative_eq!(angle_deg(&o, &Point::new(0.0, 10.0)), 180.0);
        assert_relative_eq!(angle_deg(&o, &Point::new(10.0, 0.0)), -90.0);
        assert_eq!(angle_deg(&o, &o), 0.0);
    }

    #[test]
    fn angle_wrapping() {
        assert_relative_eq!(normalize_angle_deg(-180.0), 180.0);
        assert_relative_eq!(normalize_angle_deg(540.0), 180.0);
        assert_relative_eq!(normalize_angle_deg(-190.0), 170.0);
        assert_relative_eq!(angle_diff_deg(170.0, -170.0), 20.0);
        assert_relative_eq!(angle_diff_deg(-90.0, 90.0), 180.0);
    }

    #[test]
    fn shoelace_area_is_unsigned() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 0.0);
        let c = Point::new(0.0, 3.0);
        assert_relative_eq!(triangle_area(&a, &b, &c), 6.0);
        assert_relative_eq!(triangle_area(&a, &c, &b), 6.0);
        assert_relative_eq!(triangle_area(&a, &b, &Point::new(8.0, 0.0)), 0.0);
    }

    #[test]
    fn nearest_point_prefers_lowest_index_on_ties() {
        let query = Point::new(0.0, 0.0);
        let candidates = [
            Point::new(5.0, 5.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(-2.0, 0.0),
        ];
        let (idx, dist) = nearest_point(&query, &candidates).expect("non-empty");
        assert_eq!(idx, 1);
        assert_relative_eq!(dist, 2.0);

        let (idx, _) = nearest_point(&query, &candidates[2..]).expect("non-empty");
        assert_eq!(idx, 0);
    }

    #[test]
    fn nearest_point_rejects_empty_input() {
        assert_eq!(
            nearest_point(&Point::origin(), &[]),
            Err(GeometryError::EmptyCandidates)
        );
    }
}
