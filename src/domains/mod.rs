//! Domain descriptors: the field catalogue, feature order, risk rules,
//! normal ranges and bundled content for each classifier.

pub mod heart;
pub mod sleep;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::intelligence::severity::SeverityAssessment;
use crate::intelligence::types::{NormalizedInput, RiskRule};
use crate::models::{BmiCategory, ClinicalField, Keyed, NormalRange};
use crate::predictor::{Confidence, ModelExpectation};

pub use heart::HeartDomain;
pub use sleep::SleepDomain;

/// Everything the generic assessment pipeline needs to know about one
/// classifier. Implementors are zero-sized markers over static tables.
pub trait Domain: Send + Sync + 'static {
    type Class: Keyed;
    type Factor: Keyed;

    const NAME: &'static str;

    /// File name used when content is overridden from a directory.
    const CONTENT_FILE: &'static str;

    /// Content JSON compiled into the binary.
    const BUNDLED_CONTENT: &'static str;

    /// Whether every class must carry education text.
    const REQUIRES_EDUCATION: bool = false;

    /// Caller-facing fields, including derived ones.
    fn fields() -> &'static [ClinicalField];

    /// Model feature vector layout.
    fn feature_order() -> &'static [&'static str];

    /// Risk rules in declaration order.
    fn rules() -> &'static [RiskRule<Self::Factor>];

    fn normal_ranges() -> &'static [NormalRange];

    /// Class with no condition detected (index 0).
    fn baseline() -> Self::Class {
        Self::Class::ALL[0]
    }

    /// Class the positive linear score points toward.
    fn at_risk() -> Self::Class {
        Self::Class::ALL[Self::Class::ALL.len() - 1]
    }

    /// Computed fields from validated inputs.
    fn derive(_values: &BTreeMap<&'static str, f64>) -> Vec<(&'static str, f64)> {
        Vec::new()
    }

    fn severity(
        _class: Self::Class,
        _confidence: &Confidence,
        _input: &NormalizedInput,
    ) -> Option<SeverityAssessment> {
        None
    }

    fn body_mass(_input: &NormalizedInput) -> Option<BmiReading> {
        None
    }

    fn field(key: &str) -> Option<&'static ClinicalField> {
        Self::fields().iter().find(|f| f.key == key)
    }

    fn expectation() -> ModelExpectation {
        ModelExpectation {
            feature_names: Self::feature_order(),
            class_count: Self::Class::ALL.len(),
        }
    }
}

/// Body-mass index derived from height and weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiReading {
    pub value: f64,
    /// One decimal, as displayed and compared against the normal range.
    pub rounded: f64,
    pub category: BmiCategory,
}

impl BmiReading {
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            rounded: round_to(value, 1),
            category: BmiCategory::from_bmi(value),
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
