use featurefinder_core::{distance, Point};
use serde::{Deserialize, Serialize};

/// One raw fiducial detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionCandidate {
    pub center: Point,
    /// Blob area in px² (or line length in px for line detectors).
    pub size_metric: f64,
    /// Roundness in `[0, 1]`; 1 is a perfect circle.
    pub circularity: f64,
}

impl DetectionCandidate {
    pub fn new(center: Point, size_metric: f64, circularity: f64) -> Self {
        Self {
            center,
            size_metric,
            circularity,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.center.x.is_finite()
            && self.center.y.is_finite()
            && self.size_metric.is_finite()
            && self.circularity.is_finite()
    }
}

/// Reference slot a fiducial was matched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceLabel {
    Left,
    Right,
    /// No slot claimed this candidate; left for the caller to review.
    Unmatched,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub label: ReferenceLabel,
    pub point: Point,
    /// Index into the caller's raw candidate list.
    pub source_index: usize,
    /// Direction of the candidate seen from the pivot, degrees.
    pub angle_deg: f64,
    /// Signed lateral distance (px) from the nearest slot's expected ray.
    pub offset_px: f64,
}

/// Secondary (non-fiducial) detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FeatureCandidate {
    Rect { center: Point, area: f64 },
    Line { start: Point, end: Point },
}

impl FeatureCandidate {
    /// Area for rectangles, length for lines.
    pub fn size_metric(&self) -> f64 {
        match self {
            FeatureCandidate::Rect { area, .. } => *area,
            FeatureCandidate::Line { start, end } => distance(start, end),
        }
    }
}

/// Resolved references plus the bookkeeping of how they were obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolveReport {
    /// One entry per surviving candidate, in input order.
    pub references: Vec<ResolvedReference>,
    pub pivot: Point,
    /// Candidates merged away as duplicates.
    pub duplicates_removed: usize,
    /// Candidates dropped by the size/shape gate.
    pub rejected_by_shape: usize,
    /// Measured triangle area when the topology check ran.
    pub triangle_area: Option<f64>,
}

impl ResolveReport {
    pub fn find(&self, label: ReferenceLabel) -> Option<&ResolvedReference> {
        self.references.iter().find(|r| r.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_and_features_parse_from_detector_json() {
        let cands: Vec<DetectionCandidate> = serde_json::from_str(
            r#"[{"center": [1512.5, 1098.0], "size_metric": 2870.0, "circularity": 0.91}]"#,
        )
        .expect("candidate JSON");
        assert_eq!(cands[0].center, Point::new(1512.5, 1098.0));

        let features: Vec<FeatureCandidate> = serde_json::from_str(
            r#"[
                {"kind": "rect", "center": [10.0, 20.0], "area": 12000.0},
                {"kind": "line", "start": [0.0, 0.0], "end": [3.0, 4.0]}
            ]"#,
        )
        .expect("feature JSON");
        assert_eq!(features[0].size_metric(), 12000.0);
        assert_eq!(features[1].size_metric(), 5.0);
    }

    #[test]
    fn labels_serialize_lowercase() {
        let json = serde_json::to_string(&ReferenceLabel::Unmatched).expect("serialize");
        assert_eq!(json, r#""unmatched""#);
    }
}
