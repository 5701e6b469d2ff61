use featurefinder_core::GeometryError;

/// Errors returned by the reference resolver.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error(
        "fiducial triangle area {measured:.1} px^2 outside {expected:.1} px^2 +/- {:.0}%",
        .tolerance * 100.0
    )]
    TopologyMismatch {
        measured: f64,
        expected: f64,
        tolerance: f64,
    },
}

impl ResolveError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ResolveError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<GeometryError> for ResolveError {
    fn from(err: GeometryError) -> Self {
        ResolveError::invalid(err.to_string())
    }
}
