//! Field schema endpoints, used by form front ends to render inputs.

use axum::Json;
use serde::Serialize;

use crate::domains::{Domain, HeartDomain, SleepDomain};
use crate::models::ClinicalField;

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub domain: &'static str,
    pub fields: &'static [ClinicalField],
    /// Order in which the classifier consumes features.
    pub feature_order: &'static [&'static str],
}

fn schema<D: Domain>() -> SchemaResponse {
    SchemaResponse {
        domain: D::NAME,
        fields: D::fields(),
        feature_order: D::feature_order(),
    }
}

/// `GET /api/heart/schema`
pub async fn heart() -> Json<SchemaResponse> {
    Json(schema::<HeartDomain>())
}

/// `GET /api/sleep/schema`
pub async fn sleep() -> Json<SchemaResponse> {
    Json(schema::<SleepDomain>())
}
