use std::collections::BTreeMap;

use crate::intelligence::severity::{
    Band, ScoreBand, SeverityAssessment, SeverityCriterion, SeverityCutpoints, SeverityScale,
    SeveritySource,
};
use crate::intelligence::types::{NormalizedInput, Predicate, RiskRule};
use crate::models::{CategoryOption, ClinicalField, NormalRange, SleepClass, SleepRiskFactor};
use crate::predictor::Confidence;

use super::{BmiReading, Domain};

/// Three-class sleep-disorder classifier (healthy / insomnia / sleep apnea).
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepDomain;

const GENDER: &[CategoryOption] = &[
    CategoryOption { label: "Perempuan", code: 0 },
    CategoryOption { label: "Laki-laki", code: 1 },
];

static FIELDS: [ClinicalField; 14] = [
    ClinicalField::categorical("gender", "Gender", GENDER),
    ClinicalField::integer("age", "Usia", "Tahun", 10, 100),
    ClinicalField::integer("occupation", "Kode Pekerjaan", "", 0, 9),
    ClinicalField::numeric("sleep_duration", "Durasi Tidur", "Jam", 0.0, 12.0),
    ClinicalField::integer("quality_of_sleep", "Kualitas Tidur", "Skor", 1, 10),
    ClinicalField::integer("physical_activity", "Aktivitas Fisik", "Menit/hari", 0, 120),
    ClinicalField::integer("stress_level", "Tingkat Stres", "Skor", 1, 10),
    ClinicalField::numeric("heart_rate", "Heart Rate", "bpm", 40.0, 120.0),
    ClinicalField::integer("daily_steps", "Daily Steps", "Langkah", 0, 30_000),
    ClinicalField::numeric("systolic_bp", "Systolic BP", "mmHg", 80.0, 200.0),
    ClinicalField::numeric("diastolic_bp", "Diastolic BP", "mmHg", 50.0, 130.0),
    ClinicalField::numeric("height_cm", "Tinggi Badan", "cm", 100.0, 250.0),
    ClinicalField::numeric("weight_kg", "Berat Badan", "kg", 30.0, 200.0),
    ClinicalField::derived("bmi", "BMI", "kg/m²"),
];

static FEATURE_ORDER: [&str; 11] = [
    "gender",
    "age",
    "occupation",
    "sleep_duration",
    "quality_of_sleep",
    "physical_activity",
    "stress_level",
    "heart_rate",
    "daily_steps",
    "systolic_bp",
    "diastolic_bp",
];

fn outside_sleep_hours(hours: f64) -> bool {
    hours < 6.0 || hours > 9.0
}

fn very_poor_quality(score: f64) -> bool {
    score <= 3.0
}

fn very_high_stress(score: f64) -> bool {
    score >= 8.0
}

fn abnormal_resting_rate(bpm: f64) -> bool {
    bpm > 100.0 || bpm < 60.0
}

fn very_low_activity(minutes: f64) -> bool {
    minutes < 20.0
}

fn very_low_steps(steps: f64) -> bool {
    steps < 3000.0
}

fn bmi_out_of_range(bmi: f64) -> bool {
    bmi < 18.5 || bmi > 24.9
}

static RULES: [RiskRule<SleepRiskFactor>; 9] = [
    RiskRule {
        factor: SleepRiskFactor::SleepDuration,
        field: "sleep_duration",
        predicate: Predicate::Custom { describe: "< 6 or > 9", test: outside_sleep_hours },
        description: "Durasi tidur ideal adalah 6–9 jam/malam.",
    },
    RiskRule {
        factor: SleepRiskFactor::QualityOfSleep,
        field: "quality_of_sleep",
        predicate: Predicate::Custom { describe: "<= 3", test: very_poor_quality },
        description: "Kualitas tidur sangat rendah — perlu perbaikan rutinitas tidur.",
    },
    RiskRule {
        factor: SleepRiskFactor::StressLevel,
        field: "stress_level",
        predicate: Predicate::Custom { describe: ">= 8", test: very_high_stress },
        description: "Tingkat stres sangat tinggi — berdampak besar pada kualitas tidur.",
    },
    RiskRule {
        factor: SleepRiskFactor::HeartRate,
        field: "heart_rate",
        predicate: Predicate::Custom { describe: "> 100 or < 60", test: abnormal_resting_rate },
        description: "Heart rate di luar rentang normal istirahat (60–100 bpm).",
    },
    RiskRule {
        factor: SleepRiskFactor::PhysicalActivity,
        field: "physical_activity",
        predicate: Predicate::Custom { describe: "< 20", test: very_low_activity },
        description: "Aktivitas fisik sangat rendah — direkomendasikan setidaknya 30 menit/hari.",
    },
    RiskRule {
        factor: SleepRiskFactor::DailySteps,
        field: "daily_steps",
        predicate: Predicate::Custom { describe: "< 3000", test: very_low_steps },
        description: "Jumlah langkah harian sangat rendah — target minimal 5.000 langkah/hari.",
    },
    RiskRule {
        factor: SleepRiskFactor::SystolicBp,
        field: "systolic_bp",
        predicate: Predicate::GreaterThan(140.0),
        description: "Tekanan darah sistolik tinggi — konsultasikan dengan dokter.",
    },
    RiskRule {
        factor: SleepRiskFactor::DiastolicBp,
        field: "diastolic_bp",
        predicate: Predicate::GreaterThan(90.0),
        description: "Tekanan darah diastolik tinggi — konsultasikan dengan dokter.",
    },
    RiskRule {
        factor: SleepRiskFactor::Bmi,
        field: "bmi",
        predicate: Predicate::Custom { describe: "< 18.5 or > 24.9", test: bmi_out_of_range },
        description: "BMI di luar rentang normal — berisiko mempengaruhi kualitas tidur.",
    },
];

static NORMAL_RANGES: [NormalRange; 10] = [
    NormalRange::unbounded("age"),
    NormalRange::bounded("sleep_duration", 6.0, 9.0),
    NormalRange::bounded("quality_of_sleep", 7.0, 10.0),
    NormalRange::bounded("physical_activity", 30.0, 60.0),
    NormalRange::bounded("stress_level", 1.0, 5.0),
    NormalRange::bounded("heart_rate", 60.0, 100.0),
    NormalRange::bounded("daily_steps", 5000.0, 10_000.0),
    NormalRange::bounded("systolic_bp", 90.0, 120.0),
    NormalRange::bounded("diastolic_bp", 60.0, 80.0),
    NormalRange::bounded("bmi", 18.5, 24.9).rounded(1),
];

/// Severity of a detected disorder: prediction confidence, poor sleep
/// quality, high stress and very short sleep each add points.
pub static SLEEP_SEVERITY: SeverityScale = SeverityScale {
    criteria: &[
        SeverityCriterion {
            name: "confidence",
            source: SeveritySource::Confidence,
            bands: &[
                ScoreBand { band: Band::AtLeast(80.0), points: 2 },
                ScoreBand { band: Band::AtLeast(60.0), points: 1 },
            ],
        },
        SeverityCriterion {
            name: "quality_of_sleep",
            source: SeveritySource::Field("quality_of_sleep"),
            bands: &[
                ScoreBand { band: Band::AtMost(3.0), points: 2 },
                ScoreBand { band: Band::AtMost(5.0), points: 1 },
            ],
        },
        SeverityCriterion {
            name: "stress_level",
            source: SeveritySource::Field("stress_level"),
            bands: &[
                ScoreBand { band: Band::AtLeast(8.0), points: 2 },
                ScoreBand { band: Band::AtLeast(6.0), points: 1 },
            ],
        },
        SeverityCriterion {
            name: "sleep_duration",
            source: SeveritySource::Field("sleep_duration"),
            bands: &[ScoreBand { band: Band::Below(5.0), points: 1 }],
        },
    ],
    cutpoints: SeverityCutpoints { mild_max: 2, moderate_max: 4 },
};

impl Domain for SleepDomain {
    type Class = SleepClass;
    type Factor = SleepRiskFactor;

    const NAME: &'static str = "sleep";
    const CONTENT_FILE: &'static str = "sleep_content.json";
    const BUNDLED_CONTENT: &'static str = include_str!("../../resources/sleep_content.json");
    const REQUIRES_EDUCATION: bool = true;

    fn fields() -> &'static [ClinicalField] {
        &FIELDS
    }

    fn feature_order() -> &'static [&'static str] {
        &FEATURE_ORDER
    }

    fn rules() -> &'static [RiskRule<SleepRiskFactor>] {
        &RULES
    }

    fn normal_ranges() -> &'static [NormalRange] {
        &NORMAL_RANGES
    }

    fn derive(values: &BTreeMap<&'static str, f64>) -> Vec<(&'static str, f64)> {
        match (values.get("height_cm"), values.get("weight_kg")) {
            (Some(height_cm), Some(weight_kg)) => {
                let height_m = height_cm / 100.0;
                vec![("bmi", weight_kg / (height_m * height_m))]
            }
            _ => Vec::new(),
        }
    }

    fn severity(
        class: SleepClass,
        confidence: &Confidence,
        input: &NormalizedInput,
    ) -> Option<SeverityAssessment> {
        if class == Self::baseline() {
            Some(SeverityAssessment::baseline())
        } else {
            Some(SLEEP_SEVERITY.score(confidence, input))
        }
    }

    fn body_mass(input: &NormalizedInput) -> Option<BmiReading> {
        input.get("bmi").map(BmiReading::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BmiCategory, Keyed, SeverityTier};

    fn input(duration: f64, quality: f64, stress: f64) -> NormalizedInput {
        let mut values = BTreeMap::new();
        values.insert("sleep_duration", duration);
        values.insert("quality_of_sleep", quality);
        values.insert("stress_level", stress);
        NormalizedInput { values, features: Vec::new() }
    }

    #[test]
    fn bmi_is_derived_from_height_and_weight() {
        let mut values = BTreeMap::new();
        values.insert("height_cm", 170.0);
        values.insert("weight_kg", 65.0);
        let derived = SleepDomain::derive(&values);
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].0, "bmi");
        assert!((derived[0].1 - 22.4913).abs() < 1e-4);
    }

    #[test]
    fn body_mass_reading() {
        let mut values = BTreeMap::new();
        values.insert("bmi", 31.2);
        let reading = SleepDomain::body_mass(&NormalizedInput { values, features: vec![] }).unwrap();
        assert_eq!(reading.category, BmiCategory::Obese);
    }

    #[test]
    fn baseline_prediction_has_no_severity_score() {
        let result = SleepDomain::severity(
            SleepClass::Healthy,
            &Confidence::from_probability(0.95),
            &input(4.0, 2.0, 9.0),
        )
        .unwrap();
        assert_eq!(result.tier, SeverityTier::None);
        assert!(result.score.is_none());
    }

    #[test]
    fn worst_case_is_severe() {
        let result = SleepDomain::severity(
            SleepClass::SleepApnea,
            &Confidence::from_probability(0.9),
            &input(4.0, 2.0, 9.0),
        )
        .unwrap();
        assert_eq!(result.score, Some(7));
        assert_eq!(result.max_score, Some(7));
        assert_eq!(result.tier, SeverityTier::Severe);
    }

    #[test]
    fn severity_examples() {
        // Low confidence, poor sleep, high stress, short sleep: 0 + 2 + 2 + 1.
        let result = SleepDomain::severity(
            SleepClass::Insomnia,
            &Confidence::from_probability(0.4192),
            &input(4.0, 2.0, 9.0),
        )
        .unwrap();
        assert_eq!(result.score, Some(5));
        assert_eq!(result.tier, SeverityTier::Severe);

        let result = SleepDomain::severity(
            SleepClass::Insomnia,
            &Confidence::from_probability(0.65),
            &input(6.5, 5.0, 6.0),
        )
        .unwrap();
        assert_eq!(result.score, Some(3));
        assert_eq!(result.tier, SeverityTier::Moderate);

        let result = SleepDomain::severity(
            SleepClass::Insomnia,
            &Confidence::from_probability(0.5),
            &input(7.0, 8.0, 3.0),
        )
        .unwrap();
        assert_eq!(result.score, Some(0));
        assert_eq!(result.tier, SeverityTier::Mild);
    }

    fn score_at(probability: f64, duration: f64, quality: f64, stress: f64) -> u32 {
        SleepDomain::severity(
            SleepClass::Insomnia,
            &Confidence::from_probability(probability),
            &input(duration, quality, stress),
        )
        .and_then(|r| r.score)
        .unwrap()
    }

    #[test]
    fn severity_is_monotone_in_confidence() {
        let mut previous = score_at(0.34, 7.0, 6.0, 3.0);
        for step in 35..=100 {
            let current = score_at(step as f64 / 100.0, 7.0, 6.0, 3.0);
            assert!(previous <= current, "score fell at p={}", step as f64 / 100.0);
            previous = current;
        }
        assert_eq!(score_at(0.34, 7.0, 6.0, 3.0), 0);
        assert_eq!(previous, 2);
    }

    #[test]
    fn severity_is_monotone_in_quality() {
        let mut previous = score_at(0.5, 7.0, 10.0, 3.0);
        for quality in (1..10).rev() {
            let current = score_at(0.5, 7.0, quality as f64, 3.0);
            assert!(previous <= current, "score fell at quality={quality}");
            previous = current;
        }
        assert_eq!(previous, 2);
    }

    #[test]
    fn severity_is_monotone_in_stress_and_duration() {
        let conf = Confidence::from_probability(0.7);
        let score = |d, q, s| {
            SleepDomain::severity(SleepClass::Insomnia, &conf, &input(d, q, s))
                .and_then(|r| r.score)
                .unwrap()
        };
        for stress in 1..10 {
            assert!(score(7.0, 6.0, stress as f64) <= score(7.0, 6.0, stress as f64 + 1.0));
        }
        assert!(score(5.0, 6.0, 3.0) <= score(4.9, 6.0, 3.0));
    }

    #[test]
    fn rules_cover_every_factor_in_order() {
        let factors: Vec<_> = SleepDomain::rules().iter().map(|r| r.factor).collect();
        assert_eq!(factors, SleepRiskFactor::ALL);
    }

    #[test]
    fn rule_boundaries() {
        let rule = |f: SleepRiskFactor| SleepDomain::rules()[f.index()].predicate;
        assert!(!rule(SleepRiskFactor::SleepDuration).matches(6.0));
        assert!(rule(SleepRiskFactor::SleepDuration).matches(9.5));
        assert!(rule(SleepRiskFactor::QualityOfSleep).matches(3.0));
        assert!(!rule(SleepRiskFactor::QualityOfSleep).matches(4.0));
        assert!(rule(SleepRiskFactor::HeartRate).matches(59.0));
        assert!(!rule(SleepRiskFactor::HeartRate).matches(100.0));
        assert!(rule(SleepRiskFactor::Bmi).matches(24.95));
        assert!(!rule(SleepRiskFactor::Bmi).matches(18.5));
    }

    #[test]
    fn bmi_is_not_a_model_feature() {
        assert!(!SleepDomain::feature_order().contains(&"bmi"));
        assert!(SleepDomain::field("bmi").unwrap().domain.is_derived());
        assert_eq!(SleepDomain::expectation().class_count, 3);
    }
}
