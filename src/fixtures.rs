//! Shared test fixtures: small hand-made models and example patients.

use std::sync::Arc;

use serde_json::json;

use crate::config::{HEART_ARTIFACT, MODEL_VERSION, SLEEP_ARTIFACT};
use crate::domains::{Domain, HeartDomain, SleepDomain};
use crate::intelligence::engine::Assessor;
use crate::intelligence::reference::load_content;
use crate::intelligence::types::RawInput;
use crate::predictor::artifact::{ArtifactModel, ModelArtifact};
use crate::predictor::{ArtifactLocation, BasicPredictor, DecisionStump, ModelSlot};

fn raw(value: serde_json::Value) -> RawInput {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Binary logistic model; net score 1.35 for `heart_example`, -1.73 for
/// `heart_healthy`.
pub fn heart_artifact() -> ModelArtifact {
    ModelArtifact {
        name: HEART_ARTIFACT.into(),
        version: MODEL_VERSION.into(),
        feature_names: HeartDomain::feature_order().iter().map(|s| s.to_string()).collect(),
        class_count: 2,
        model: ArtifactModel::LogisticRegression {
            coefficients: vec![vec![
                0.01, 0.5, 0.3, 0.01, 0.004, 0.2, 0.2, -0.02, 0.8, 0.5, 0.4, 0.7, 0.3,
            ]],
            intercepts: vec![-2.0],
        },
    }
}

/// Three stumps over sleep duration, systolic BP and stress.
pub fn sleep_artifact() -> ModelArtifact {
    let stump = |feature, threshold, left_class, right_class, weight| DecisionStump {
        feature,
        threshold,
        left_class,
        right_class,
        weight,
    };
    ModelArtifact {
        name: SLEEP_ARTIFACT.into(),
        version: MODEL_VERSION.into(),
        feature_names: SleepDomain::feature_order().iter().map(|s| s.to_string()).collect(),
        class_count: 3,
        model: ArtifactModel::AdaBoost {
            estimators: vec![
                stump(3, 5.5, 1, 0, 1.0),
                stump(9, 135.0, 0, 2, 0.8),
                stump(6, 6.5, 0, 1, 0.6),
            ],
        },
    }
}

pub fn heart_model() -> Arc<dyn BasicPredictor> {
    heart_artifact().into_predictor().unwrap()
}

pub fn sleep_model() -> Arc<dyn BasicPredictor> {
    sleep_artifact().into_predictor().unwrap()
}

fn preloaded<D: Domain>(name: &str, model: Arc<dyn BasicPredictor>) -> ModelSlot {
    ModelSlot::preloaded(
        ArtifactLocation::new("/unused", name, MODEL_VERSION),
        D::expectation(),
        model,
    )
}

pub fn heart_assessor() -> Assessor<HeartDomain> {
    Assessor::new(
        preloaded::<HeartDomain>(HEART_ARTIFACT, heart_model()),
        load_content::<HeartDomain>(None).unwrap(),
    )
}

pub fn sleep_assessor() -> Assessor<SleepDomain> {
    Assessor::new(
        preloaded::<SleepDomain>(SLEEP_ARTIFACT, sleep_model()),
        load_content::<SleepDomain>(None).unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

/// Nine heart risk flags; predicted Disease at ~79.4%.
pub fn heart_example() -> RawInput {
    raw(json!({
        "age": 55,
        "sex": "Laki-laki",
        "chest_pain_type": "Typical Angina",
        "resting_blood_pressure": 130,
        "cholesterol": 250,
        "fasting_blood_sugar": "Ya",
        "resting_electrocardiogram": "Normal",
        "max_heart_rate_achieved": 150,
        "exercise_induced_angina": "Ya",
        "st_depression": 1.2,
        "st_slope": "Flat",
        "num_major_vessels": 1,
        "thalassemia": "Fixed Defect"
    }))
}

pub fn heart_example_features() -> Vec<f64> {
    vec![55.0, 1.0, 0.0, 130.0, 250.0, 1.0, 0.0, 150.0, 1.0, 1.2, 1.0, 1.0, 1.0]
}

/// No heart flags; predicted NoDisease at ~84.9%.
pub fn heart_healthy() -> RawInput {
    raw(json!({
        "age": 40,
        "sex": "Perempuan",
        "chest_pain_type": "Non-anginal Pain",
        "resting_blood_pressure": 110,
        "cholesterol": 180,
        "fasting_blood_sugar": "Tidak",
        "resting_electrocardiogram": "Normal",
        "max_heart_rate_achieved": 170,
        "exercise_induced_angina": "Tidak",
        "st_depression": 0.5,
        "st_slope": "Upsloping",
        "num_major_vessels": 0,
        "thalassemia": "Normal"
    }))
}

pub fn heart_healthy_features() -> Vec<f64> {
    vec![40.0, 0.0, 2.0, 110.0, 180.0, 0.0, 0.0, 170.0, 0.0, 0.5, 0.0, 0.0, 2.0]
}

/// Short, poor sleep under high stress; BMI 22.5. Predicted Insomnia.
pub fn sleep_example() -> RawInput {
    raw(json!({
        "gender": "Laki-laki",
        "age": 35,
        "occupation": 2,
        "sleep_duration": 4.0,
        "quality_of_sleep": 2,
        "physical_activity": 50,
        "stress_level": 9,
        "heart_rate": 70,
        "daily_steps": 8000,
        "systolic_bp": 120,
        "diastolic_bp": 80,
        "height_cm": 170,
        "weight_kg": 65.0
    }))
}

/// Every field inside its normal range. Predicted Healthy.
pub fn sleep_healthy() -> RawInput {
    raw(json!({
        "gender": "Perempuan",
        "age": 30,
        "occupation": 0,
        "sleep_duration": 7.5,
        "quality_of_sleep": 8,
        "physical_activity": 50,
        "stress_level": 3,
        "heart_rate": 70,
        "daily_steps": 8000,
        "systolic_bp": 115,
        "diastolic_bp": 75,
        "height_cm": 170,
        "weight_kg": 65.0
    }))
}
