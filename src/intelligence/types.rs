use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::Keyed;
use crate::predictor::{ModelUnavailableError, PredictorError};

use super::explain::ExplainError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw request body: field key to JSON value (label string or number).
pub type RawInput = serde_json::Map<String, serde_json::Value>;

/// Validated numeric input. `values` holds every supplied and derived field;
/// `features` is the model vector in the domain's feature order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedInput {
    pub values: BTreeMap<&'static str, f64>,
    pub features: Vec<f64>,
}

impl NormalizedInput {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Condition a single field value must satisfy to raise a flag.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// `value > bound`
    GreaterThan(f64),
    /// Value equals one of the category codes.
    OneOf(&'static [i64]),
    /// Arbitrary test over one field, with a human-readable form.
    Custom {
        describe: &'static str,
        test: fn(f64) -> bool,
    },
}

impl Predicate {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Self::GreaterThan(bound) => value > *bound,
            Self::OneOf(codes) => codes.iter().any(|&c| c as f64 == value),
            Self::Custom { test, .. } => test(value),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::GreaterThan(bound) => format!("> {bound}"),
            Self::OneOf(codes) => {
                let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
                format!("in {{{}}}", codes.join(", "))
            }
            Self::Custom { describe, .. } => (*describe).to_string(),
        }
    }
}

/// One stateless threshold rule, keyed by the risk factor it raises.
#[derive(Debug, Clone, Copy)]
pub struct RiskRule<F> {
    pub factor: F,
    pub field: &'static str,
    pub predicate: Predicate,
    pub description: &'static str,
}

/// A rule that fired for this request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRisk<F> {
    pub factor: F,
    pub field: &'static str,
    pub display_name: &'static str,
    pub value: f64,
    /// Category label for coded fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_label: Option<&'static str>,
    pub condition: String,
    pub description: &'static str,
}

impl<F: Keyed> FlaggedRisk<F> {
    pub fn key(&self) -> &'static str {
        self.factor.key()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request input rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Field {field} is computed and cannot be supplied")]
    DerivedField { field: &'static str },

    #[error("Field {field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field {field} value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Field {field} must be a whole number, got {value}")]
    NotInteger { field: &'static str, value: f64 },

    #[error("Field {field} has unknown category: {value}")]
    UnknownCategory { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field } => field,
            Self::MissingField { field }
            | Self::DerivedField { field }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotInteger { field, .. }
            | Self::UnknownCategory { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailableError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictorError),

    #[error("Explanation failed: {0}")]
    Explanation(#[from] ExplainError),
}
