use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde::Serialize;

use super::artifact::{load_artifact, ArtifactLocation, ModelExpectation};
use super::{BasicPredictor, ModelUnavailableError};

type LoadResult = Result<Arc<dyn BasicPredictor>, ModelUnavailableError>;

/// Load state reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    NotLoaded,
    Ready,
    Failed,
}

/// Lazily loaded, process-lifetime model. The first `get` loads the
/// artifact; every later call (success or failure) returns the memoized
/// outcome without touching the filesystem again.
pub struct ModelSlot {
    location: ArtifactLocation,
    expectation: ModelExpectation,
    cell: OnceLock<LoadResult>,
}

impl ModelSlot {
    pub fn new(location: ArtifactLocation, expectation: ModelExpectation) -> Self {
        Self {
            location,
            expectation,
            cell: OnceLock::new(),
        }
    }

    /// Slot already holding a model (tests, embedded use).
    pub fn preloaded(
        location: ArtifactLocation,
        expectation: ModelExpectation,
        model: Arc<dyn BasicPredictor>,
    ) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Ok(model));
        Self {
            location,
            expectation,
            cell,
        }
    }

    pub fn location(&self) -> &ArtifactLocation {
        &self.location
    }

    pub fn get(&self) -> LoadResult {
        self.cell
            .get_or_init(|| {
                let start = Instant::now();
                let result = load_artifact(&self.location, &self.expectation);
                match &result {
                    Ok(model) => tracing::info!(
                        path = %self.location.path().display(),
                        kind = %model.metadata().kind,
                        load_ms = start.elapsed().as_millis() as u64,
                        "Model artifact loaded"
                    ),
                    Err(e) => tracing::error!(
                        path = %self.location.path().display(),
                        reason = %e.reason,
                        "Model artifact unavailable"
                    ),
                }
                result
            })
            .clone()
    }

    pub fn state(&self) -> ModelState {
        match self.cell.get() {
            None => ModelState::NotLoaded,
            Some(Ok(_)) => ModelState::Ready,
            Some(Err(_)) => ModelState::Failed,
        }
    }
}

impl std::fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSlot")
            .field("artifact", &self.location.file_name())
            .field("state", &self.state())
            .finish()
    }
}
