use featurefinder_profile::DetectionProfile;

use crate::types::{DetectionCandidate, FeatureCandidate};

/// Whether a fiducial candidate has a valid size and is round enough.
pub fn passes_shape_gate(candidate: &DetectionCandidate, profile: &DetectionProfile) -> bool {
    profile.circle_size().contains(candidate.size_metric)
        && candidate.circularity >= profile.circularity_min()
}

/// Indices of secondary features that fit the profile.
///
/// Rectangles must fall inside `rect_size`; lines must be at least
/// `hough_min_length_px` long.
pub fn filter_secondary_features(
    features: &[FeatureCandidate],
    profile: &DetectionProfile,
) -> Vec<usize> {
    features
        .iter()
        .enumerate()
        .filter(|(_, f)| match f {
            FeatureCandidate::Rect { area, .. } => profile.rect_size().contains(*area),
            FeatureCandidate::Line { .. } => f.size_metric() >= profile.hough_min_length_px(),
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use featurefinder_core::Point;
    use featurefinder_profile::{ProfileOverrides, SizeRange};

    fn profile() -> DetectionProfile {
        DetectionProfile::default().with_overrides(&ProfileOverrides {
            circle_size: Some(SizeRange::new(1000.0, 5000.0)),
            circularity_min: Some(0.7),
            ..ProfileOverrides::default()
        })
    }

    #[test]
    fn sizes_inside_range_pass() {
        let p = profile();
        for size in [1200.0, 3000.0, 4800.0] {
            let c = DetectionCandidate::new(Point::new(0.0, 0.0), size, 0.9);
            assert!(passes_shape_gate(&c, &p), "size {size}");
        }
        let tiny = DetectionCandidate::new(Point::new(0.0, 0.0), 800.0, 0.9);
        assert!(!passes_shape_gate(&tiny, &p));
        let huge = DetectionCandidate::new(Point::new(0.0, 0.0), 5200.0, 0.9);
        assert!(!passes_shape_gate(&huge, &p));
    }

    #[test]
    fn low_circularity_fails() {
        let c = DetectionCandidate::new(Point::new(0.0, 0.0), 3000.0, 0.5);
        assert!(!passes_shape_gate(&c, &profile()));
    }

    #[test]
    fn secondary_features_use_rect_and_line_limits() {
        let p = DetectionProfile::default();
        let features = [
            FeatureCandidate::Rect {
                center: Point::new(10.0, 10.0),
                area: 20000.0,
            },
            FeatureCandidate::Rect {
                center: Point::new(10.0, 10.0),
                area: 40000.0,
            },
            FeatureCandidate::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 29.0),
            },
            FeatureCandidate::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(30.0, 40.0),
            },
        ];
        assert_eq!(filter_secondary_features(&features, &p), vec![0, 3]);
    }
}
