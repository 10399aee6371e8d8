use serde::{Deserialize, Serialize};

use super::math::softmax;
use super::{check_features, BasicPredictor, ModelMetadata, PredictorError};

/// Depth-1 tree: `x[feature] <= threshold` votes `left_class`, otherwise
/// `right_class`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStump {
    pub feature: usize,
    pub threshold: f64,
    pub left_class: usize,
    pub right_class: usize,
    pub weight: f64,
}

impl DecisionStump {
    pub fn vote(&self, features: &[f64]) -> usize {
        if features[self.feature] <= self.threshold {
            self.left_class
        } else {
            self.right_class
        }
    }
}

/// AdaBoost (SAMME) over decision stumps.
#[derive(Debug, Clone)]
pub struct BoostedStumps {
    metadata: ModelMetadata,
    estimators: Vec<DecisionStump>,
    total_weight: f64,
}

impl BoostedStumps {
    pub fn from_parts(metadata: ModelMetadata, estimators: Vec<DecisionStump>) -> Result<Self, String> {
        let n_features = metadata.feature_names.len();
        let classes = metadata.class_count;
        if classes < 2 {
            return Err(format!("class_count must be at least 2, got {classes}"));
        }
        if estimators.is_empty() {
            return Err("ensemble has no estimators".into());
        }
        for (i, stump) in estimators.iter().enumerate() {
            if stump.feature >= n_features {
                return Err(format!(
                    "estimator {i} splits on feature {} but the model has {n_features}",
                    stump.feature
                ));
            }
            if stump.left_class >= classes || stump.right_class >= classes {
                return Err(format!("estimator {i} votes for a class outside 0..{classes}"));
            }
            if !stump.threshold.is_finite() || !stump.weight.is_finite() || stump.weight <= 0.0 {
                return Err(format!("estimator {i} has a non-finite threshold or non-positive weight"));
            }
        }
        let total_weight = estimators.iter().map(|s| s.weight).sum();

        Ok(Self {
            metadata,
            estimators,
            total_weight,
        })
    }

    /// Weighted SAMME decision per class, normalised by total estimator weight.
    pub fn decision(&self, features: &[f64]) -> Vec<f64> {
        let classes = self.metadata.class_count;
        let against = -1.0 / (classes as f64 - 1.0);
        let mut decision = vec![0.0; classes];
        for stump in &self.estimators {
            let vote = stump.vote(features);
            for (k, d) in decision.iter_mut().enumerate() {
                *d += stump.weight * if k == vote { 1.0 } else { against };
            }
        }
        decision.iter_mut().for_each(|d| *d /= self.total_weight);
        decision
    }
}

impl BasicPredictor for BoostedStumps {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictorError> {
        check_features(features, self.metadata.feature_names.len())?;
        let scale = self.metadata.class_count as f64 - 1.0;
        let scaled: Vec<f64> = self.decision(features).iter().map(|d| d / scale).collect();
        Ok(softmax(&scaled))
    }
}
