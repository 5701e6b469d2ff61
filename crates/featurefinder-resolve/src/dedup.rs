use featurefinder_core::distance;

use crate::types::DetectionCandidate;

/// Collapse detections of the same physical fiducial.
///
/// Candidates are grouped by single linkage: two candidates closer than
/// `cutoff_px` share a group, transitively. Each group keeps the candidate
/// whose size metric is closest to `expected_size` (first in input order
/// on ties, or always the first when `expected_size` is `None`).
///
/// Returns the kept indices in input order. Kept candidates are pairwise at
/// least `cutoff_px` apart, so running this again on them keeps all of them.
pub fn deduplicate(
    candidates: &[DetectionCandidate],
    cutoff_px: f64,
    expected_size: Option<f64>,
) -> Vec<usize> {
    const UNASSIGNED: usize = usize::MAX;

    let n = candidates.len();
    let mut group = vec![UNASSIGNED; n];
    let mut kept = Vec::new();

    for seed in 0..n {
        if group[seed] != UNASSIGNED {
            continue;
        }
        let gid = kept.len();
        group[seed] = gid;
        let mut members = vec![seed];
        let mut stack = vec![seed];
        while let Some(i) = stack.pop() {
            for j in 0..n {
                if group[j] == UNASSIGNED
                    && distance(&candidates[i].center, &candidates[j].center) < cutoff_px
                {
                    group[j] = gid;
                    members.push(j);
                    stack.push(j);
                }
            }
        }
        members.sort_unstable();

        let deviation = |idx: usize| match expected_size {
            Some(expected) => (candidates[idx].size_metric - expected).abs(),
            None => 0.0,
        };
        let representative = members
            .iter()
            .copied()
            .min_by(|&a, &b| deviation(a).total_cmp(&deviation(b)))
            .unwrap_or(seed);
        kept.push(representative);
    }

    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use featurefinder_core::Point;

    fn cand(x: f64, y: f64, size: f64) -> DetectionCandidate {
        DetectionCandidate::new(Point::new(x, y), size, 1.0)
    }

    #[test]
    fn close_pair_collapses_to_one() {
        let candidates = [cand(100.0, 100.0, 3000.0), cand(104.0, 103.0, 3000.0)];
        assert_eq!(deduplicate(&candidates, 150.0, Some(3000.0)), vec![0]);
    }

    #[test]
    fn keeps_candidate_closest_to_expected_size() {
        let candidates = [
            cand(0.0, 0.0, 900.0),
            cand(10.0, 0.0, 2900.0),
            cand(20.0, 0.0, 3100.0),
            cand(500.0, 0.0, 4000.0),
        ];
        assert_eq!(deduplicate(&candidates, 50.0, Some(3000.0)), vec![1, 3]);
        assert_eq!(deduplicate(&candidates, 50.0, None), vec![0, 3]);
    }

    #[test]
    fn grouping_is_transitive() {
        // 0-1 and 1-2 are within the cutoff, 0-2 is not.
        let candidates = [
            cand(0.0, 0.0, 1000.0),
            cand(80.0, 0.0, 1000.0),
            cand(160.0, 0.0, 1000.0),
        ];
        assert_eq!(deduplicate(&candidates, 100.0, Some(1000.0)), vec![0]);
    }

    #[test]
    fn deduplication_is_idempotent() {
        let candidates = [
            cand(0.0, 0.0, 1200.0),
            cand(30.0, 40.0, 3000.0),
            cand(400.0, 0.0, 2500.0),
            cand(420.0, 10.0, 2600.0),
            cand(900.0, 900.0, 5000.0),
            cand(300.0, 300.0, 1000.0),
        ];
        let first: Vec<DetectionCandidate> = deduplicate(&candidates, 100.0, Some(3000.0))
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        let second: Vec<DetectionCandidate> = deduplicate(&first, 100.0, Some(3000.0))
            .into_iter()
            .map(|i| first[i])
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(deduplicate(&[], 100.0, None).is_empty());
    }
}
