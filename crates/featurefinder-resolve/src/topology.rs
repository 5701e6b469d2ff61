use featurefinder_core::{triangle_area, Point};
use featurefinder_profile::DetectionProfile;
use log::warn;

use crate::error::ResolveError;

/// Verify the triangle spanned by three fiducials.
///
/// Runs only for exactly three points and a positive expected area;
/// otherwise returns `Ok(None)`. On success returns the measured area.
pub fn check_triangle(
    points: &[Point],
    profile: &DetectionProfile,
) -> Result<Option<f64>, ResolveError> {
    let expected = profile.fiducial_triangle_area();
    let [a, b, c] = points else {
        return Ok(None);
    };
    if expected <= 0.0 {
        return Ok(None);
    }

    let measured = triangle_area(a, b, c);
    let tolerance = profile.triangle_area_tolerance();
    if (measured - expected).abs() > tolerance * expected {
        warn!(
            "fiducial triangle area {measured:.1} px^2 does not match expected {expected:.1} px^2"
        );
        return Err(ResolveError::TopologyMismatch {
            measured,
            expected,
            tolerance,
        });
    }
    Ok(Some(measured))
}
