//! Shared state for the HTTP layer.

use std::path::Path;

use crate::config::{AppConfig, HEART_ARTIFACT, MODEL_VERSION, SLEEP_ARTIFACT};
use crate::domains::{Domain, HeartDomain, SleepDomain};
use crate::intelligence::{load_content, Assessor, ReferenceError};
use crate::predictor::{ArtifactLocation, ModelSlot};

// ═══════════════════════════════════════════════════════════
// App state: one assessor per domain
// ═══════════════════════════════════════════════════════════

/// Shared state for all API routes. Wrapped in `Arc` by the router.
pub struct AppState {
    pub heart: Assessor<HeartDomain>,
    pub sleep: Assessor<SleepDomain>,
}

impl AppState {
    pub fn new(heart: Assessor<HeartDomain>, sleep: Assessor<SleepDomain>) -> Self {
        Self { heart, sleep }
    }

    /// Build both assessors. Content tables are validated here; model
    /// artifacts are loaded lazily on first use.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReferenceError> {
        let content_dir = config.content_dir.as_deref();
        Ok(Self {
            heart: assessor::<HeartDomain>(
                &config.models_dir,
                HEART_ARTIFACT,
                config.heart_model_sha256.as_deref(),
                content_dir,
            )?,
            sleep: assessor::<SleepDomain>(
                &config.models_dir,
                SLEEP_ARTIFACT,
                config.sleep_model_sha256.as_deref(),
                content_dir,
            )?,
        })
    }
}

fn assessor<D: Domain>(
    models_dir: &Path,
    artifact: &str,
    sha256: Option<&str>,
    content_dir: Option<&Path>,
) -> Result<Assessor<D>, ReferenceError> {
    let location = ArtifactLocation::new(models_dir, artifact, MODEL_VERSION)
        .with_sha256(sha256.map(str::to_string));
    let content = load_content::<D>(content_dir)?;
    tracing::info!(
        domain = D::NAME,
        artifact = %location.path().display(),
        "Assessor configured"
    );
    Ok(Assessor::new(ModelSlot::new(location, D::expectation()), content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::ModelState;

    fn config(models_dir: &Path, content_dir: Option<&Path>) -> AppConfig {
        AppConfig {
            bind: "127.0.0.1:0".parse().unwrap(),
            models_dir: models_dir.to_path_buf(),
            content_dir: content_dir.map(Path::to_path_buf),
            heart_model_sha256: None,
            sleep_model_sha256: None,
            log_filter: "info".into(),
        }
    }

    #[test]
    fn from_config_uses_bundled_content_and_defers_models() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_config(&config(dir.path(), None)).unwrap();
        assert_eq!(state.heart.model_state(), ModelState::NotLoaded);
        assert_eq!(state.sleep.model_state(), ModelState::NotLoaded);
    }

    #[test]
    fn broken_content_override_refuses_to_start() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("heart_content.json"), "{}").unwrap();
        let result = AppState::from_config(&config(dir.path(), Some(dir.path())));
        assert!(result.is_err());
    }

    #[test]
    fn missing_content_override_is_a_load_error() {
        let models = tempfile::tempdir().unwrap();
        let content = tempfile::tempdir().unwrap();
        let result = AppState::from_config(&config(models.path(), Some(content.path())));
        assert!(matches!(result, Err(ReferenceError::Load(..))));
    }
}
