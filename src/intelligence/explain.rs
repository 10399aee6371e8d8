use serde::Serialize;
use thiserror::Error;

use crate::predictor::{BasicPredictor, UnsupportedModelKindError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplainError {
    #[error(transparent)]
    UnsupportedModelKind(#[from] UnsupportedModelKindError),

    #[error("Feature vector has {features} values but the model has {coefficients} coefficients")]
    LengthMismatch { features: usize, coefficients: usize },

    #[error("Model lists {names} feature names but has {coefficients} coefficients")]
    NameMismatch { names: usize, coefficients: usize },
}

/// Additive share of one feature in a linear decision score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub value: f64,
    pub coefficient: f64,
    /// `coefficient * value`; positive pushes toward the at-risk class.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionBreakdown {
    /// Ranked by contribution, largest first.
    pub contributions: Vec<FeatureContribution>,
    pub intercept: f64,
    /// Sum of contributions plus intercept.
    pub net_score: f64,
}

impl ContributionBreakdown {
    pub fn favours_at_risk(&self) -> bool {
        self.net_score > 0.0
    }

    /// Smallest contribution first (chart order).
    pub fn ascending(&self) -> Vec<FeatureContribution> {
        let mut sorted = self.contributions.clone();
        sorted.sort_by(|a, b| a.contribution.total_cmp(&b.contribution));
        sorted
    }
}

/// `coefficient[i] * value[i]` for each positionally aligned feature,
/// ranked descending. Ties keep feature order.
pub fn feature_contributions(
    names: &[String],
    coefficients: &[f64],
    values: &[f64],
) -> Result<Vec<FeatureContribution>, ExplainError> {
    if names.len() != coefficients.len() {
        return Err(ExplainError::NameMismatch {
            names: names.len(),
            coefficients: coefficients.len(),
        });
    }
    if values.len() != coefficients.len() {
        return Err(ExplainError::LengthMismatch {
            features: values.len(),
            coefficients: coefficients.len(),
        });
    }

    let mut contributions: Vec<FeatureContribution> = names
        .iter()
        .zip(coefficients.iter().zip(values.iter()))
        .map(|(name, (&coefficient, &value))| FeatureContribution {
            feature: name.clone(),
            value,
            coefficient,
            contribution: coefficient * value,
        })
        .collect();
    contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    Ok(contributions)
}

/// Contribution breakdown for a linear predictor; any other model kind
/// yields `UnsupportedModelKind`.
pub fn explain(
    predictor: &dyn BasicPredictor,
    values: &[f64],
) -> Result<ContributionBreakdown, ExplainError> {
    let metadata = predictor.metadata();
    let linear = predictor
        .as_explainable()
        .ok_or_else(|| UnsupportedModelKindError {
            model: metadata.name.clone(),
            kind: metadata.kind,
        })?;

    let contributions =
        feature_contributions(&metadata.feature_names, linear.coefficients(), values)?;
    let intercept = linear.intercept();
    let net_score = contributions.iter().map(|c| c.contribution).sum::<f64>() + intercept;

    Ok(ContributionBreakdown {
        contributions,
        intercept,
        net_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("x{i}")).collect()
    }

    #[test]
    fn contributions_are_products_ranked_descending() {
        let result = feature_contributions(&names(3), &[0.5, -1.0, 2.0], &[2.0, 3.0, 0.25]).unwrap();
        let order: Vec<_> = result.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(order, vec!["x0", "x2", "x1"]);
        assert_eq!(result[0].contribution, 1.0);
        assert_eq!(result[2].contribution, -3.0);
    }

    #[test]
    fn ties_keep_feature_order() {
        let result = feature_contributions(&names(3), &[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]).unwrap();
        let order: Vec<_> = result.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(order, vec!["x0", "x1", "x2"]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert_eq!(
            feature_contributions(&names(2), &[1.0, 2.0], &[1.0]),
            Err(ExplainError::LengthMismatch { features: 1, coefficients: 2 })
        );
    }

    #[test]
    fn name_count_mismatch_is_reported_separately() {
        // Feature vector is the right width; only the name list is short.
        assert_eq!(
            feature_contributions(&names(1), &[1.0, 2.0], &[1.0, 1.0]),
            Err(ExplainError::NameMismatch { names: 1, coefficients: 2 })
        );
    }

    #[test]
    fn heart_net_score_matches_decision() {
        let model = fixtures::heart_model();
        let features = fixtures::heart_example_features();
        let breakdown = explain(model.as_ref(), &features).unwrap();
        assert!((breakdown.net_score - 1.35).abs() < 1e-9);
        assert_eq!(breakdown.intercept, -2.0);
        assert!(breakdown.favours_at_risk());

        let total: f64 = breakdown.contributions.iter().map(|c| c.contribution).sum();
        assert!((total + breakdown.intercept - breakdown.net_score).abs() < 1e-12);

        // Largest push toward disease is blood pressure (0.01 * 130).
        assert_eq!(breakdown.contributions[0].feature, "resting_blood_pressure");
        let ascending = breakdown.ascending();
        assert_eq!(ascending[0].feature, "max_heart_rate_achieved");
    }

    #[test]
    fn net_sign_matches_predicted_class() {
        let model = fixtures::heart_model();
        for features in [fixtures::heart_example_features(), fixtures::heart_healthy_features()] {
            let breakdown = explain(model.as_ref(), &features).unwrap();
            let predicted = model.predict(&features).unwrap().class_index;
            assert_eq!(breakdown.favours_at_risk(), predicted == 1);
        }
    }

    #[test]
    fn boosted_model_is_unsupported() {
        let model = fixtures::sleep_model();
        let err = explain(model.as_ref(), &[0.0; 11]).unwrap_err();
        assert!(matches!(err, ExplainError::UnsupportedModelKind(_)));
    }
}
