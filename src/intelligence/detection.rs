use crate::models::{ClinicalField, Keyed};

use super::types::{FlaggedRisk, NormalizedInput, RiskRule};

/// Evaluate every rule independently against the normalized input.
/// Triggered rules are returned in declaration order.
pub fn detect_risk_factors<F: Keyed>(
    rules: &[RiskRule<F>],
    fields: &'static [ClinicalField],
    input: &NormalizedInput,
) -> Vec<FlaggedRisk<F>> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = input.get(rule.field)?;
            if !rule.predicate.matches(value) {
                return None;
            }
            let field = fields.iter().find(|f| f.key == rule.field);
            Some(FlaggedRisk {
                factor: rule.factor,
                field: rule.field,
                display_name: field.map_or(rule.field, |f| f.display_name),
                value,
                value_label: field.and_then(|f| f.domain.label_for_code(value as i64)),
                condition: rule.predicate.describe(),
                description: rule.description,
            })
        })
        .collect()
}
