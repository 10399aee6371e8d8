use serde::Serialize;

use crate::domains::round_to;
use crate::models::{ClinicalField, NormalRange, RangeStatus};

use super::types::NormalizedInput;

/// One row of the normal-range table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeComparison {
    pub field: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
    /// Patient value as compared (rounded where the range says so).
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub status: RangeStatus,
}

/// Normal iff `min <= value <= max`; not applicable when either bound is
/// missing.
pub fn classify(value: f64, min: Option<f64>, max: Option<f64>) -> RangeStatus {
    match (min, max) {
        (Some(min), Some(max)) => {
            if value < min {
                RangeStatus::BelowNormal
            } else if value > max {
                RangeStatus::AboveNormal
            } else {
                RangeStatus::Normal
            }
        }
        _ => RangeStatus::NotApplicable,
    }
}

pub fn compare_normal_ranges(
    ranges: &[NormalRange],
    fields: &'static [ClinicalField],
    input: &NormalizedInput,
) -> Vec<RangeComparison> {
    ranges
        .iter()
        .filter_map(|range| {
            let raw = input.get(range.field)?;
            let value = range.decimals.map_or(raw, |d| round_to(raw, d));
            let field = fields.iter().find(|f| f.key == range.field);
            Some(RangeComparison {
                field: range.field,
                display_name: field.map_or(range.field, |f| f.display_name),
                unit: field.map_or("", |f| f.unit),
                value,
                min: range.min,
                max: range.max,
                status: classify(value, range.min, range.max),
            })
        })
        .collect()
}
