use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domains::{BmiReading, Domain};
use crate::models::Keyed;
use crate::predictor::{Confidence, ModelKind, ModelMetadata, Prediction};

use super::comparison::{compare_normal_ranges, RangeComparison};
use super::detection::detect_risk_factors;
use super::explain::ContributionBreakdown;
use super::reference::{ContentTables, Education};
use super::severity::SeverityAssessment;
use super::types::{FlaggedRisk, NormalizedInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub kind: ModelKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability<C> {
    pub class: C,
    pub label: String,
    /// Probability in `[0, 1]`.
    pub probability: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionSection<C> {
    #[serde(flatten)]
    pub breakdown: ContributionBreakdown,
    /// Class the net decision score points toward.
    pub favoured_class: C,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifestyleTipGroup<F> {
    pub factor: F,
    pub tips: Vec<String>,
}

/// Everything shown to the patient for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport<C, F> {
    pub assessment_id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub domain: &'static str,
    pub model: ModelInfo,
    pub prediction: C,
    pub prediction_label: String,
    pub confidence: Confidence,
    pub probabilities: Vec<ClassProbability<C>>,
    pub risk_factors: Vec<FlaggedRisk<F>>,
    pub risk_factor_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<SeverityAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<ContributionSection<C>>,
    pub normal_range_comparison: Vec<RangeComparison>,
    pub recommendations: Vec<String>,
    pub lifestyle_tips: Vec<LifestyleTipGroup<F>>,
    /// Present only when no risk factor was flagged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_mass_index: Option<BmiReading>,
    pub normalized_input: NormalizedInput,
}

/// Caller-supplied identity of one assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentStamp {
    pub id: Uuid,
    pub at: DateTime<Utc>,
}

impl AssessmentStamp {
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
        }
    }
}

/// Combine prediction, flags, explanation and content into one report.
/// Pure: identical arguments give identical reports.
pub fn assemble<D: Domain>(
    stamp: AssessmentStamp,
    metadata: &ModelMetadata,
    class: D::Class,
    prediction: &Prediction,
    input: NormalizedInput,
    breakdown: Option<ContributionBreakdown>,
    content: &ContentTables<D::Class, D::Factor>,
) -> AssessmentReport<D::Class, D::Factor> {
    let confidence = prediction.confidence();

    let probabilities = D::Class::ALL
        .iter()
        .zip(prediction.distribution.iter())
        .map(|(&c, &p)| ClassProbability {
            class: c,
            label: content.label(c).to_string(),
            probability: p,
            percent: p * 100.0,
        })
        .collect();

    let risk_factors = detect_risk_factors(D::rules(), D::fields(), &input);
    let lifestyle_tips = lifestyle_groups(&risk_factors, content);
    let lifestyle_note = risk_factors
        .is_empty()
        .then(|| content.no_risk_note().to_string());

    let contributions = breakdown.map(|breakdown| ContributionSection {
        favoured_class: if breakdown.favours_at_risk() {
            D::at_risk()
        } else {
            D::baseline()
        },
        breakdown,
    });

    AssessmentReport {
        assessment_id: stamp.id,
        assessed_at: stamp.at,
        domain: D::NAME,
        model: ModelInfo {
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            kind: metadata.kind,
        },
        prediction: class,
        prediction_label: content.label(class).to_string(),
        severity: D::severity(class, &confidence, &input),
        confidence,
        probabilities,
        risk_factor_count: risk_factors.len(),
        risk_factors,
        contributions,
        normal_range_comparison: compare_normal_ranges(D::normal_ranges(), D::fields(), &input),
        recommendations: content.recommendations(class).to_vec(),
        lifestyle_tips,
        lifestyle_note,
        education: content.education(class).cloned(),
        body_mass_index: D::body_mass(&input),
        normalized_input: input,
    }
}

/// One tip group per flagged factor, in flag order, each factor once.
fn lifestyle_groups<C: Keyed, F: Keyed>(
    flags: &[FlaggedRisk<F>],
    content: &ContentTables<C, F>,
) -> Vec<LifestyleTipGroup<F>> {
    let mut groups: Vec<LifestyleTipGroup<F>> = Vec::with_capacity(flags.len());
    for flag in flags {
        if groups.iter().any(|g| g.factor == flag.factor) {
            continue;
        }
        let tips = content.lifestyle_tips(flag.factor);
        if !tips.is_empty() {
            groups.push(LifestyleTipGroup {
                factor: flag.factor,
                tips: tips.to_vec(),
            });
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{HeartDomain, SleepDomain};
    use crate::fixtures;
    use crate::intelligence::explain::explain;
    use crate::intelligence::normalize::normalize;
    use crate::intelligence::reference::load_content;
    use crate::models::{HeartClass, HeartRiskFactor, SleepClass, SleepRiskFactor};

    fn stamp() -> AssessmentStamp {
        AssessmentStamp {
            id: Uuid::nil(),
            at: DateTime::parse_from_rfc3339("2026-01-15T08:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn heart_report(raw: &crate::intelligence::types::RawInput) -> AssessmentReport<HeartClass, HeartRiskFactor> {
        let model = fixtures::heart_model();
        let input = normalize::<HeartDomain>(raw).unwrap();
        let prediction = model.predict(&input.features).unwrap();
        let breakdown = explain(model.as_ref(), &input.features).ok();
        let class = HeartClass::ALL[prediction.class_index];
        let content = load_content::<HeartDomain>(None).unwrap();
        assemble::<HeartDomain>(stamp(), model.metadata(), class, &prediction, input, breakdown, &content)
    }

    fn sleep_report(raw: &crate::intelligence::types::RawInput) -> AssessmentReport<SleepClass, SleepRiskFactor> {
        let model = fixtures::sleep_model();
        let input = normalize::<SleepDomain>(raw).unwrap();
        let prediction = model.predict(&input.features).unwrap();
        let breakdown = explain(model.as_ref(), &input.features).ok();
        let class = SleepClass::ALL[prediction.class_index];
        let content = load_content::<SleepDomain>(None).unwrap();
        assemble::<SleepDomain>(stamp(), model.metadata(), class, &prediction, input, breakdown, &content)
    }

    #[test]
    fn heart_example_report() {
        let report = heart_report(&fixtures::heart_example());
        assert_eq!(report.prediction, HeartClass::Disease);
        assert_eq!(report.prediction_label, "🔴 Ada Penyakit Jantung");
        assert!((report.confidence.value - 79.413).abs() < 0.01);
        assert_eq!(report.risk_factor_count, 9);
        assert_eq!(report.lifestyle_tips.len(), 9);
        assert_eq!(report.lifestyle_tips[0].factor, HeartRiskFactor::RestingBloodPressure);
        assert!(report.lifestyle_note.is_none());
        assert!(report.severity.is_none());
        assert!(report.education.is_none());
        assert!(report.body_mass_index.is_none());

        let contributions = report.contributions.unwrap();
        assert_eq!(contributions.favoured_class, HeartClass::Disease);
        assert_eq!(contributions.breakdown.contributions.len(), 13);
    }

    #[test]
    fn heart_healthy_report_gets_no_risk_note() {
        let report = heart_report(&fixtures::heart_healthy());
        assert_eq!(report.prediction, HeartClass::NoDisease);
        assert!((report.confidence.value - 84.94).abs() < 0.01);
        assert!(report.risk_factors.is_empty());
        assert!(report.lifestyle_tips.is_empty());
        assert!(report.lifestyle_note.unwrap().starts_with("✅ Data Anda terlihat sehat!"));
        assert_eq!(report.contributions.unwrap().favoured_class, HeartClass::NoDisease);
        assert_eq!(report.recommendations.len(), 7);
    }

    #[test]
    fn sleep_example_report() {
        let report = sleep_report(&fixtures::sleep_example());
        assert_eq!(report.prediction, SleepClass::Insomnia);
        assert_eq!(report.risk_factor_count, 3);
        assert!(report.contributions.is_none());

        let severity = report.severity.unwrap();
        assert_eq!(severity.score, Some(5));
        assert_eq!(severity.tier, crate::models::SeverityTier::Severe);

        let bmi = report.body_mass_index.unwrap();
        assert_eq!(bmi.rounded, 22.5);
        assert_eq!(bmi.category, crate::models::BmiCategory::Normal);

        let education = report.education.unwrap();
        assert!(education.definition.starts_with("Insomnia adalah"));
        assert_eq!(report.probabilities.len(), 3);
        assert_eq!(report.probabilities[2].class, SleepClass::SleepApnea);
    }

    #[test]
    fn sleep_healthy_report() {
        let report = sleep_report(&fixtures::sleep_healthy());
        assert_eq!(report.prediction, SleepClass::Healthy);
        assert_eq!(report.prediction_label, "Sehat");
        assert_eq!(report.severity.unwrap().tier, crate::models::SeverityTier::None);
        assert!(report.lifestyle_note.is_some());
        assert!(report.education.is_some());
    }

    #[test]
    fn probabilities_sum_to_one() {
        let report = sleep_report(&fixtures::sleep_example());
        let total: f64 = report.probabilities.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = heart_report(&fixtures::heart_example());
        let b = heart_report(&fixtures::heart_example());
        assert_eq!(a, b);
    }

    #[test]
    fn report_json_shape() {
        let json = serde_json::to_value(heart_report(&fixtures::heart_example())).unwrap();
        assert_eq!(json["domain"], "heart");
        assert_eq!(json["prediction"], "disease");
        assert_eq!(json["confidence"]["tier"], "medium");
        assert_eq!(json["model"]["kind"], "logistic_regression");
        assert_eq!(json["contributions"]["favoured_class"], "disease");
        assert!(json["contributions"]["net_score"].is_number());
        assert!(json.get("severity").is_none());
        assert_eq!(json["risk_factors"][0]["factor"], "resting_blood_pressure");
        assert_eq!(json["assessment_id"], "00000000-0000-0000-0000-000000000000");
    }
}
