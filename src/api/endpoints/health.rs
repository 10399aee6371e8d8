//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::AppState;
use crate::predictor::ModelState;

#[derive(Debug, Serialize)]
pub struct ModelStates {
    pub heart: ModelState,
    pub sleep: ModelState,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub models: ModelStates,
}

/// `GET /api/health`: liveness plus per-model load state.
///
/// Never triggers a model load.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        models: ModelStates {
            heart: state.heart.model_state(),
            sleep: state.sleep.model_state(),
        },
    })
}
