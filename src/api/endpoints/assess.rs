//! Assessment endpoints.
//!
//! The pipeline is synchronous and the first call per domain may read the
//! model artifact from disk, so it runs on the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::domains::{Domain, HeartDomain, SleepDomain};
use crate::intelligence::{AssessmentReport, Assessor, RawInput};

type Report<D> = AssessmentReport<<D as Domain>::Class, <D as Domain>::Factor>;

async fn run<D: Domain>(
    state: Arc<AppState>,
    raw: RawInput,
    pick: fn(&AppState) -> &Assessor<D>,
) -> Result<Json<Report<D>>, ApiError> {
    let report = tokio::task::spawn_blocking(move || pick(&state).assess(&raw))
        .await
        .map_err(|e| ApiError::Internal(format!("Assessment task failed: {e}")))??;
    Ok(Json(report))
}

/// `POST /api/heart/assess`
pub async fn heart(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<Json<Report<HeartDomain>>, ApiError> {
    let Json(raw) = payload?;
    run::<HeartDomain>(state, raw, |s| &s.heart).await
}

/// `POST /api/sleep/assess`
pub async fn sleep(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<Json<Report<SleepDomain>>, ApiError> {
    let Json(raw) = payload?;
    run::<SleepDomain>(state, raw, |s| &s.sleep).await
}
