use crate::{core, profile, resolve};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Profile(#[from] profile::ProfileError),

    #[error(transparent)]
    Resolve(#[from] resolve::ResolveError),

    #[error("image artifacts carry no pixel array to take the center from")]
    MissingImageDimensions,

    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),
}

/// Selects a detection profile by test-system name and resolves candidates.
///
/// Profiles are rebuilt on every call, so one pipeline can serve several
/// worker threads.
#[derive(Clone, Debug)]
pub struct DetectionPipeline {
    catalog: profile::ProfileCatalog,
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionPipeline {
    /// Pipeline over the built-in test-system catalog.
    pub fn new() -> Self {
        Self::with_catalog(profile::ProfileCatalog::builtin())
    }

    pub fn with_catalog(catalog: profile::ProfileCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &profile::ProfileCatalog {
        &self.catalog
    }

    /// Build the normalized profile for `system`.
    pub fn profile(
        &self,
        system: &str,
        tag: Option<&str>,
    ) -> Result<profile::DetectionProfile, PipelineError> {
        Ok(self.catalog.build(system, tag)?)
    }

    pub fn resolve(
        &self,
        system: &str,
        tag: Option<&str>,
        candidates: &[resolve::DetectionCandidate],
        image_center: core::Point,
    ) -> Result<Vec<resolve::ResolvedReference>, PipelineError> {
        Ok(self
            .resolve_report(system, tag, candidates, image_center)?
            .references)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, candidates), fields(num_candidates = candidates.len()))
    )]
    pub fn resolve_report(
        &self,
        system: &str,
        tag: Option<&str>,
        candidates: &[resolve::DetectionCandidate],
        image_center: core::Point,
    ) -> Result<resolve::ResolveReport, PipelineError> {
        let profile = self.profile(system, tag)?;
        let resolver = resolve::ReferenceResolver::new(profile);
        Ok(resolver.resolve_report(candidates, image_center)?)
    }

    /// Like [`resolve_report`](Self::resolve_report), taking the image center
    /// from the loaded image arrays.
    pub fn resolve_with_artifacts(
        &self,
        system: &str,
        tag: Option<&str>,
        candidates: &[resolve::DetectionCandidate],
        artifacts: &core::ImageArtifacts,
    ) -> Result<resolve::ResolveReport, PipelineError> {
        let center = artifacts
            .center()
            .ok_or(PipelineError::MissingImageDimensions)?;
        self.resolve_report(system, tag, candidates, center)
    }
}

/// Resolve against a built-in test system without going through a catalog.
pub fn resolve_for_system(
    system: profile::TestSystem,
    tag: Option<&str>,
    candidates: &[resolve::DetectionCandidate],
    image_center: core::Point,
) -> Result<Vec<resolve::ResolvedReference>, PipelineError> {
    let profile = profile::DetectionProfile::for_system(system, tag);
    Ok(resolve::ReferenceResolver::new(profile).resolve(candidates, image_center)?)
}
