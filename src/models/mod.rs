pub mod enums;
pub mod field;

pub use enums::{
    BmiCategory, ConfidenceTier, HeartClass, HeartRiskFactor, Keyed, RangeStatus, SeverityTier,
    SleepClass, SleepRiskFactor, UnknownKey,
};
pub use field::{CategoryOption, ClinicalField, NormalRange, ValueDomain};
