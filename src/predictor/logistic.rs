use super::math::{dot, sigmoid, softmax};
use super::{check_features, BasicPredictor, ExplainablePredictor, ModelMetadata, PredictorError};

/// Logistic regression exported as coefficient rows and intercepts.
///
/// Binary models carry a single row scoring the positive class (index 1);
/// multiclass models carry one row per class and use softmax.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    metadata: ModelMetadata,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticModel {
    pub fn from_parts(
        metadata: ModelMetadata,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, String> {
        let n_features = metadata.feature_names.len();
        let classes = metadata.class_count;

        let expected_rows = match classes {
            0 | 1 => return Err(format!("class_count must be at least 2, got {classes}")),
            2 => 1,
            k => k,
        };
        if coefficients.len() != expected_rows {
            return Err(format!(
                "expected {expected_rows} coefficient rows for {classes} classes, got {}",
                coefficients.len()
            ));
        }
        if intercepts.len() != expected_rows {
            return Err(format!(
                "expected {expected_rows} intercepts, got {}",
                intercepts.len()
            ));
        }
        if let Some((i, row)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_features)
        {
            return Err(format!(
                "coefficient row {i} has {} values, expected {n_features}",
                row.len()
            ));
        }
        let all_finite = coefficients.iter().flatten().chain(intercepts.iter()).all(|v| v.is_finite());
        if !all_finite {
            return Err("coefficients and intercepts must be finite".into());
        }

        Ok(Self {
            metadata,
            coefficients,
            intercepts,
        })
    }

    pub fn is_binary(&self) -> bool {
        self.metadata.class_count == 2
    }

    /// Raw decision score toward the positive class (binary models).
    pub fn decision_score(&self, features: &[f64]) -> f64 {
        dot(&self.coefficients[0], features) + self.intercepts[0]
    }
}

impl BasicPredictor for LogisticModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, PredictorError> {
        check_features(features, self.metadata.feature_names.len())?;

        if self.is_binary() {
            let p1 = sigmoid(self.decision_score(features));
            return Ok(vec![1.0 - p1, p1]);
        }

        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(row, b)| dot(row, features) + b)
            .collect();
        Ok(softmax(&scores))
    }

    fn as_explainable(&self) -> Option<&dyn ExplainablePredictor> {
        if self.is_binary() {
            Some(self)
        } else {
            None
        }
    }
}

impl ExplainablePredictor for LogisticModel {
    fn coefficients(&self) -> &[f64] {
        &self.coefficients[0]
    }

    fn intercept(&self) -> f64 {
        self.intercepts[0]
    }
}
