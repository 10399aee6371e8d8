//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::AppState;

/// Build the API router.
///
/// Every response carries `Cache-Control: no-store`.
pub fn api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/heart/schema", get(endpoints::schema::heart))
        .route("/sleep/schema", get(endpoints::schema::sleep))
        .route("/heart/assess", post(endpoints::assess::heart))
        .route("/sleep/assess", post(endpoints::assess::sleep))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
}
