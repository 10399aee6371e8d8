//! Predictor adapter: wraps a trained classifier behind a `predict` /
//! `predict_proba` contract, with an optional linear-coefficient capability.
//!
//! Two capabilities are exposed:
//! - `BasicPredictor`: label + full class distribution (every model kind).
//! - `ExplainablePredictor`: additionally exposes per-feature coefficients
//!   and intercept (binary logistic regression only).
//!
//! Artifacts are loaded lazily, at most once per process, through `ModelSlot`.

pub mod artifact;
pub mod boosted;
pub mod logistic;
pub mod math;
pub mod registry;

use serde::Serialize;
use thiserror::Error;

use crate::models::ConfidenceTier;

pub use artifact::{ArtifactLocation, ModelArtifact, ModelExpectation};
pub use boosted::{BoostedStumps, DecisionStump};
pub use logistic::LogisticModel;
pub use registry::{ModelSlot, ModelState};

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// The model artifact cannot be used. Fatal for the predictor's lifetime:
/// the failure is memoized and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Model {artifact} unavailable: {reason}")]
pub struct ModelUnavailableError {
    pub artifact: String,
    pub reason: String,
}

/// Explanation requested from a predictor without linear coefficients.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Model {model} ({kind}) does not expose linear coefficients")]
pub struct UnsupportedModelKindError {
    pub model: String,
    pub kind: ModelKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    #[error("Expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("Feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },

    #[error("Model produced an empty probability distribution")]
    EmptyDistribution,

    #[error("Predicted class index {index} is outside 0..{classes}")]
    UnknownClass { index: usize, classes: usize },
}

// ═══════════════════════════════════════════════════════════
// Model metadata
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    AdaBoost,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "logistic_regression",
            Self::AdaBoost => "ada_boost",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    pub kind: ModelKind,
    pub feature_names: Vec<String>,
    pub class_count: usize,
}

// ═══════════════════════════════════════════════════════════
// Prediction & confidence
// ═══════════════════════════════════════════════════════════

/// Classifier output: distribution aligned to the class enumeration and the
/// index of its maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    pub distribution: Vec<f64>,
}

impl Prediction {
    pub fn from_distribution(distribution: Vec<f64>) -> Result<Self, PredictorError> {
        let class_index = argmax(&distribution).ok_or(PredictorError::EmptyDistribution)?;
        Ok(Self {
            class_index,
            distribution,
        })
    }

    /// Probability mass of the predicted class as a percentage.
    pub fn confidence(&self) -> Confidence {
        Confidence::from_probability(self.distribution[self.class_index])
    }
}

/// Index of the largest entry; ties resolve to the lowest index.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some(b) if v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Confidence {
    /// Percentage in `[0, 100]`.
    pub value: f64,
    pub tier: ConfidenceTier,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        let value = (probability * 100.0).clamp(0.0, 100.0);
        Self {
            value,
            tier: ConfidenceTier::from_percent(value),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Capabilities
// ═══════════════════════════════════════════════════════════

/// Any trained classifier. Implementors are immutable once loaded and safe
/// to share across request threads.
pub trait BasicPredictor: Send + Sync {
    fn metadata(&self) -> &ModelMetadata;

    /// Class probabilities for one feature vector, in class-index order.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictorError>;

    /// Predicted class (argmax of `predict_proba`) with its distribution.
    fn predict(&self, features: &[f64]) -> Result<Prediction, PredictorError> {
        Prediction::from_distribution(self.predict_proba(features)?)
    }

    /// Linear-coefficient capability, when the model has one.
    fn as_explainable(&self) -> Option<&dyn ExplainablePredictor> {
        None
    }
}

/// A classifier whose decision score is `coefficients · x + intercept`,
/// positive toward the at-risk class.
pub trait ExplainablePredictor: BasicPredictor {
    fn coefficients(&self) -> &[f64];

    fn intercept(&self) -> f64;
}

/// Reject feature vectors of the wrong width or with NaN/inf entries.
pub(crate) fn check_features(features: &[f64], expected: usize) -> Result<(), PredictorError> {
    if features.len() != expected {
        return Err(PredictorError::FeatureCount {
            expected,
            got: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|x| !x.is_finite()) {
        return Err(PredictorError::NonFiniteFeature { index });
    }
    Ok(())
}
