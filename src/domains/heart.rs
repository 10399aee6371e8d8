use crate::intelligence::types::{Predicate, RiskRule};
use crate::models::{CategoryOption, ClinicalField, HeartClass, HeartRiskFactor, NormalRange};

use super::Domain;

/// Binary heart-disease classifier over the 13 Cleveland-style attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeartDomain;

// ---------------------------------------------------------------------------
// Category tables
// ---------------------------------------------------------------------------

const SEX: &[CategoryOption] = &[
    CategoryOption { label: "Perempuan", code: 0 },
    CategoryOption { label: "Laki-laki", code: 1 },
];

const CHEST_PAIN: &[CategoryOption] = &[
    CategoryOption { label: "Typical Angina", code: 0 },
    CategoryOption { label: "Atypical Angina", code: 1 },
    CategoryOption { label: "Non-anginal Pain", code: 2 },
    CategoryOption { label: "Asymptomatic", code: 3 },
];

const YES_NO: &[CategoryOption] = &[
    CategoryOption { label: "Tidak", code: 0 },
    CategoryOption { label: "Ya", code: 1 },
];

const RESTING_ECG: &[CategoryOption] = &[
    CategoryOption { label: "Normal", code: 0 },
    CategoryOption { label: "ST-T Abnormality", code: 1 },
    CategoryOption { label: "Left Ventricular Hypertrophy", code: 2 },
];

const ST_SLOPE: &[CategoryOption] = &[
    CategoryOption { label: "Upsloping", code: 0 },
    CategoryOption { label: "Flat", code: 1 },
    CategoryOption { label: "Downsloping", code: 2 },
];

const THALASSEMIA: &[CategoryOption] = &[
    CategoryOption { label: "Fixed Defect", code: 1 },
    CategoryOption { label: "Normal", code: 2 },
    CategoryOption { label: "Reversible Defect", code: 3 },
];

// ---------------------------------------------------------------------------
// Fields (model feature order)
// ---------------------------------------------------------------------------

static FIELDS: [ClinicalField; 13] = [
    ClinicalField::integer("age", "Usia", "Tahun", 1, 120),
    ClinicalField::categorical("sex", "Jenis Kelamin", SEX),
    ClinicalField::categorical("chest_pain_type", "Tipe Nyeri Dada", CHEST_PAIN),
    ClinicalField::numeric("resting_blood_pressure", "Tekanan Darah Istirahat", "mm Hg", 80.0, 220.0),
    ClinicalField::numeric("cholesterol", "Kolesterol Serum", "mg/dl", 100.0, 600.0),
    ClinicalField::categorical("fasting_blood_sugar", "Gula Darah Puasa > 120 mg/dl", YES_NO),
    ClinicalField::categorical("resting_electrocardiogram", "EKG Istirahat", RESTING_ECG),
    ClinicalField::numeric("max_heart_rate_achieved", "Detak Jantung Maksimum", "bpm", 60.0, 220.0),
    ClinicalField::categorical("exercise_induced_angina", "Angina Akibat Olahraga", YES_NO),
    ClinicalField::numeric("st_depression", "ST Depression (oldpeak)", "mm", 0.0, 10.0),
    ClinicalField::categorical("st_slope", "Kemiringan ST", ST_SLOPE),
    ClinicalField::integer("num_major_vessels", "Pembuluh Darah Utama", "", 0, 3),
    ClinicalField::categorical("thalassemia", "Thalassemia", THALASSEMIA),
];

static FEATURE_ORDER: [&str; 13] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_blood_pressure",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_electrocardiogram",
    "max_heart_rate_achieved",
    "exercise_induced_angina",
    "st_depression",
    "st_slope",
    "num_major_vessels",
    "thalassemia",
];

// ---------------------------------------------------------------------------
// Risk rules
// ---------------------------------------------------------------------------

static RULES: [RiskRule<HeartRiskFactor>; 10] = [
    RiskRule {
        factor: HeartRiskFactor::RestingBloodPressure,
        field: "resting_blood_pressure",
        predicate: Predicate::GreaterThan(120.0),
        description: "Tekanan darah istirahat di atas 120 mm Hg.",
    },
    RiskRule {
        factor: HeartRiskFactor::Cholesterol,
        field: "cholesterol",
        predicate: Predicate::GreaterThan(200.0),
        description: "Kolesterol serum di atas 200 mg/dl.",
    },
    RiskRule {
        factor: HeartRiskFactor::FastingBloodSugar,
        field: "fasting_blood_sugar",
        predicate: Predicate::OneOf(&[1]),
        description: "Gula darah puasa di atas 120 mg/dl.",
    },
    RiskRule {
        factor: HeartRiskFactor::ExerciseInducedAngina,
        field: "exercise_induced_angina",
        predicate: Predicate::OneOf(&[1]),
        description: "Nyeri dada (angina) muncul saat berolahraga.",
    },
    RiskRule {
        factor: HeartRiskFactor::StDepression,
        field: "st_depression",
        predicate: Predicate::GreaterThan(1.0),
        description: "ST depression di atas 1.0 mm, dapat menandakan iskemia.",
    },
    RiskRule {
        factor: HeartRiskFactor::NumMajorVessels,
        field: "num_major_vessels",
        predicate: Predicate::GreaterThan(0.0),
        description: "Terdapat pembuluh darah utama yang terdeteksi menyempit.",
    },
    RiskRule {
        factor: HeartRiskFactor::ChestPainType,
        field: "chest_pain_type",
        predicate: Predicate::OneOf(&[0]),
        description: "Typical angina merupakan tanda kuat penyakit arteri koronari.",
    },
    RiskRule {
        factor: HeartRiskFactor::RestingElectrocardiogram,
        field: "resting_electrocardiogram",
        predicate: Predicate::OneOf(&[1, 2]),
        description: "Hasil EKG istirahat abnormal (ST-T abnormality atau LVH).",
    },
    RiskRule {
        factor: HeartRiskFactor::Thalassemia,
        field: "thalassemia",
        predicate: Predicate::OneOf(&[1, 3]),
        description: "Thalassemia fixed atau reversible defect meningkatkan risiko penyakit jantung.",
    },
    RiskRule {
        factor: HeartRiskFactor::StSlope,
        field: "st_slope",
        predicate: Predicate::OneOf(&[1, 2]),
        description: "Kemiringan ST flat atau downsloping dikaitkan dengan risiko penyakit koronari.",
    },
];

static NORMAL_RANGES: [NormalRange; 5] = [
    NormalRange::unbounded("age"),
    NormalRange::bounded("resting_blood_pressure", 80.0, 120.0),
    NormalRange::bounded("cholesterol", 0.0, 200.0),
    NormalRange::bounded("max_heart_rate_achieved", 60.0, 100.0),
    NormalRange::bounded("st_depression", 0.0, 1.0),
];

impl Domain for HeartDomain {
    type Class = HeartClass;
    type Factor = HeartRiskFactor;

    const NAME: &'static str = "heart";
    const CONTENT_FILE: &'static str = "heart_content.json";
    const BUNDLED_CONTENT: &'static str = include_str!("../../resources/heart_content.json");

    fn fields() -> &'static [ClinicalField] {
        &FIELDS
    }

    fn feature_order() -> &'static [&'static str] {
        &FEATURE_ORDER
    }

    fn rules() -> &'static [RiskRule<HeartRiskFactor>] {
        &RULES
    }

    fn normal_ranges() -> &'static [NormalRange] {
        &NORMAL_RANGES
    }
}
