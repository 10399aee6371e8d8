//! HTTP JSON API.
//!
//! Exposes the heart and sleep assessment pipelines as axum routes under
//! `/api/`. The router is composable: `api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve, start_on, RunningServer, ServerError};
pub use types::AppState;
