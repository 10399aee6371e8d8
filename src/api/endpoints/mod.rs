//! API endpoint handlers.
//!
//! One module per resource: service health, per-domain field schema,
//! and per-domain assessment.

pub mod assess;
pub mod health;
pub mod schema;
