use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of keys used to index reference tables.
///
/// Every implementor is a fieldless enum whose discriminants run `0..ALL.len()`,
/// so `index()` can address a `Vec` built in `ALL` order.
pub trait Keyed:
    Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + Serialize + Send + Sync + 'static
{
    const ALL: &'static [Self];

    fn key(&self) -> &'static str;

    fn index(&self) -> usize;

    fn from_key(s: &str) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} key: {key}")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub key: String,
}

/// Macro to generate a keyed enum with as_str + std::str::FromStr pattern
macro_rules! keyed_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl Keyed for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn key(&self) -> &'static str {
                self.as_str()
            }

            fn index(&self) -> usize {
                *self as usize
            }

            fn from_key(s: &str) -> Option<Self> {
                match s {
                    $($s => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as Keyed>::from_key(s).ok_or_else(|| UnknownKey {
                    kind: stringify!($name),
                    key: s.to_string(),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Outcome classes (class index == model output position)
// ---------------------------------------------------------------------------

keyed_enum!(
    /// Heart-disease classifier output. Index 0 is the baseline class.
    HeartClass {
        NoDisease => "no_disease",
        Disease => "disease",
    }
);

keyed_enum!(
    /// Sleep-disorder classifier output. Index 0 is the baseline class.
    SleepClass {
        Healthy => "healthy",
        Insomnia => "insomnia",
        SleepApnea => "sleep_apnea",
    }
);

// ---------------------------------------------------------------------------
// Risk factors (one per rule, declaration order)
// ---------------------------------------------------------------------------

keyed_enum!(HeartRiskFactor {
    RestingBloodPressure => "resting_blood_pressure",
    Cholesterol => "cholesterol",
    FastingBloodSugar => "fasting_blood_sugar",
    ExerciseInducedAngina => "exercise_induced_angina",
    StDepression => "st_depression",
    NumMajorVessels => "num_major_vessels",
    ChestPainType => "chest_pain_type",
    RestingElectrocardiogram => "resting_electrocardiogram",
    Thalassemia => "thalassemia",
    StSlope => "st_slope",
});

keyed_enum!(SleepRiskFactor {
    SleepDuration => "sleep_duration",
    QualityOfSleep => "quality_of_sleep",
    StressLevel => "stress_level",
    HeartRate => "heart_rate",
    PhysicalActivity => "physical_activity",
    DailySteps => "daily_steps",
    SystolicBp => "systolic_bp",
    DiastolicBp => "diastolic_bp",
    Bmi => "bmi",
});

// ---------------------------------------------------------------------------
// Ordinal tiers
// ---------------------------------------------------------------------------

keyed_enum!(ConfidenceTier {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl ConfidenceTier {
    /// Step function over a confidence percentage: >=80 High, >=60 Medium.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::High
        } else if percent >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

keyed_enum!(SeverityTier {
    None => "none",
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

keyed_enum!(RangeStatus {
    BelowNormal => "below_normal",
    Normal => "normal",
    AboveNormal => "above_normal",
    NotApplicable => "not_applicable",
});

keyed_enum!(BmiCategory {
    Underweight => "underweight",
    Normal => "normal",
    Overweight => "overweight",
    Obese => "obese",
});

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}
