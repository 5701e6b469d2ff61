use std::path::PathBuf;

/// Errors returned while selecting or loading detection profiles.
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("unknown test system `{0}`")]
    UnknownTestSystem(String),
    #[error("failed to read profile catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
