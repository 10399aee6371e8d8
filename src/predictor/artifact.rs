use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::boosted::{BoostedStumps, DecisionStump};
use super::logistic::LogisticModel;
use super::{BasicPredictor, ModelKind, ModelMetadata, ModelUnavailableError};

/// Named, versioned artifact location: `<dir>/<name>-v<version>.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactLocation {
    pub name: String,
    pub version: String,
    pub dir: PathBuf,
    /// Pinned lowercase-hex SHA-256 of the artifact file.
    pub sha256: Option<String>,
}

impl ArtifactLocation {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dir: dir.into(),
            sha256: None,
        }
    }

    pub fn with_sha256(mut self, digest: Option<String>) -> Self {
        self.sha256 = digest.map(|d| d.trim().to_lowercase());
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}-v{}.json", self.name, self.version)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    fn unavailable(&self, reason: impl Into<String>) -> ModelUnavailableError {
        ModelUnavailableError {
            artifact: self.file_name(),
            reason: reason.into(),
        }
    }
}

/// Shape the consuming domain requires of a loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelExpectation {
    pub feature_names: &'static [&'static str],
    pub class_count: usize,
}

/// On-disk JSON artifact exported from the training environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    pub feature_names: Vec<String>,
    pub class_count: usize,
    #[serde(flatten)]
    pub model: ArtifactModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactModel {
    /// One coefficient row per class (a single row for binary models).
    LogisticRegression {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// SAMME ensemble of depth-1 trees.
    AdaBoost { estimators: Vec<DecisionStump> },
}

impl ModelArtifact {
    fn kind(&self) -> ModelKind {
        match self.model {
            ArtifactModel::LogisticRegression { .. } => ModelKind::LogisticRegression,
            ArtifactModel::AdaBoost { .. } => ModelKind::AdaBoost,
        }
    }

    /// Build the in-memory predictor, validating shapes.
    pub fn into_predictor(self) -> Result<Arc<dyn BasicPredictor>, String> {
        let metadata = ModelMetadata {
            kind: self.kind(),
            name: self.name,
            version: self.version,
            feature_names: self.feature_names,
            class_count: self.class_count,
        };
        match self.model {
            ArtifactModel::LogisticRegression {
                coefficients,
                intercepts,
            } => Ok(Arc::new(LogisticModel::from_parts(
                metadata,
                coefficients,
                intercepts,
            )?)),
            ArtifactModel::AdaBoost { estimators } => {
                Ok(Arc::new(BoostedStumps::from_parts(metadata, estimators)?))
            }
        }
    }
}

/// Lowercase hex SHA-256 of a byte buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Read, verify and build a predictor from its artifact location.
pub fn load_artifact(
    location: &ArtifactLocation,
    expectation: &ModelExpectation,
) -> Result<Arc<dyn BasicPredictor>, ModelUnavailableError> {
    let path = location.path();
    let bytes = std::fs::read(&path)
        .map_err(|e| location.unavailable(format!("cannot read {}: {e}", path.display())))?;

    if let Some(expected) = &location.sha256 {
        let actual = sha256_hex(&bytes);
        if &actual != expected {
            return Err(location.unavailable(format!(
                "checksum mismatch (expected {expected}, found {actual})"
            )));
        }
    }

    let artifact: ModelArtifact = serde_json::from_slice(&bytes)
        .map_err(|e| location.unavailable(format!("cannot parse artifact: {e}")))?;

    if artifact.name != location.name || artifact.version != location.version {
        return Err(location.unavailable(format!(
            "artifact declares {} v{}",
            artifact.name, artifact.version
        )));
    }
    check_expectation(&artifact, expectation).map_err(|reason| location.unavailable(reason))?;

    artifact
        .into_predictor()
        .map_err(|reason| location.unavailable(reason))
}

fn check_expectation(artifact: &ModelArtifact, expectation: &ModelExpectation) -> Result<(), String> {
    if artifact.class_count != expectation.class_count {
        return Err(format!(
            "expected {} classes, artifact has {}",
            expectation.class_count, artifact.class_count
        ));
    }
    let matches = artifact.feature_names.len() == expectation.feature_names.len()
        && artifact
            .feature_names
            .iter()
            .zip(expectation.feature_names.iter())
            .all(|(a, e)| a == e);
    if !matches {
        return Err(format!(
            "feature order mismatch: expected [{}], artifact has [{}]",
            expectation.feature_names.join(", "),
            artifact.feature_names.join(", ")
        ));
    }
    Ok(())
}

/// Write an artifact as pretty JSON.
#[cfg(test)]
pub(crate) fn write_artifact(dir: &std::path::Path, artifact: &ModelArtifact) -> std::io::Result<PathBuf> {
    let path = dir.join(format!("{}-v{}.json", artifact.name, artifact.version));
    let json = serde_json::to_vec_pretty(artifact).map_err(std::io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
