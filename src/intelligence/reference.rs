use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::Domain;
use crate::models::Keyed;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("Failed to load content file {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse content file {0}: {1}")]
    Parse(String, String),

    #[error("Unsupported key in {table}: {key}")]
    UnsupportedKey { table: &'static str, key: String },

    #[error("Missing entry in {table}: {key}")]
    MissingEntry { table: &'static str, key: &'static str },
}

/// Disorder education text shown alongside the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub definition: String,
    pub symptoms: String,
    pub impact: String,
    pub facts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassEntry {
    label: String,
    recommendations: Vec<String>,
    #[serde(default)]
    education: Option<Education>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentFile {
    classes: BTreeMap<String, ClassEntry>,
    lifestyle_tips: BTreeMap<String, Vec<String>>,
    no_risk_note: String,
}

/// Content keyed by closed enumerations. Construction checks the JSON for
/// unknown keys and for a complete entry per enum member, so lookups are
/// total afterwards.
#[derive(Debug, Clone)]
pub struct ContentTables<C, F> {
    labels: Vec<String>,
    recommendations: Vec<Vec<String>>,
    education: Vec<Option<Education>>,
    lifestyle_tips: Vec<Vec<String>>,
    no_risk_note: String,
    _keys: PhantomData<fn() -> (C, F)>,
}

impl<C: Keyed, F: Keyed> ContentTables<C, F> {
    pub fn from_json(
        file_name: &str,
        json: &str,
        requires_education: bool,
    ) -> Result<Self, ReferenceError> {
        let file: ContentFile = serde_json::from_str(json)
            .map_err(|e| ReferenceError::Parse(file_name.to_string(), e.to_string()))?;

        let classes = index_table::<C, _>("classes", file.classes)?;
        let lifestyle_tips = index_table::<F, _>("lifestyle_tips", file.lifestyle_tips)?;

        if requires_education {
            if let Some((class, _)) = C::ALL
                .iter()
                .zip(classes.iter())
                .find(|(_, entry)| entry.education.is_none())
            {
                return Err(ReferenceError::MissingEntry {
                    table: "education",
                    key: class.key(),
                });
            }
        }

        let mut labels = Vec::with_capacity(classes.len());
        let mut recommendations = Vec::with_capacity(classes.len());
        let mut education = Vec::with_capacity(classes.len());
        for entry in classes {
            labels.push(entry.label);
            recommendations.push(entry.recommendations);
            education.push(entry.education);
        }

        Ok(Self {
            labels,
            recommendations,
            education,
            lifestyle_tips,
            no_risk_note: file.no_risk_note,
            _keys: PhantomData,
        })
    }

    /// Display label for a predicted class.
    pub fn label(&self, class: C) -> &str {
        &self.labels[class.index()]
    }

    pub fn recommendations(&self, class: C) -> &[String] {
        &self.recommendations[class.index()]
    }

    pub fn education(&self, class: C) -> Option<&Education> {
        self.education[class.index()].as_ref()
    }

    pub fn lifestyle_tips(&self, factor: F) -> &[String] {
        &self.lifestyle_tips[factor.index()]
    }

    /// Shown in place of lifestyle tips when nothing is flagged.
    pub fn no_risk_note(&self) -> &str {
        &self.no_risk_note
    }
}

/// Re-key a string map onto `K::ALL` order, rejecting unknown keys and
/// requiring every member.
fn index_table<K: Keyed, V>(
    table: &'static str,
    mut map: BTreeMap<String, V>,
) -> Result<Vec<V>, ReferenceError> {
    if let Some(key) = map.keys().find(|k| K::from_key(k).is_none()) {
        return Err(ReferenceError::UnsupportedKey {
            table,
            key: key.clone(),
        });
    }
    K::ALL
        .iter()
        .map(|k| {
            map.remove(k.key())
                .ok_or(ReferenceError::MissingEntry { table, key: k.key() })
        })
        .collect()
}

/// Build a domain's content from the bundled JSON, or from
/// `<content_dir>/<CONTENT_FILE>` when a directory is configured.
pub fn load_content<D: Domain>(
    content_dir: Option<&Path>,
) -> Result<ContentTables<D::Class, D::Factor>, ReferenceError> {
    match content_dir {
        Some(dir) => {
            let path = dir.join(D::CONTENT_FILE);
            let json = std::fs::read_to_string(&path)
                .map_err(|e| ReferenceError::Load(path.display().to_string(), e.to_string()))?;
            tracing::info!(domain = D::NAME, path = %path.display(), "Loading content override");
            ContentTables::from_json(D::CONTENT_FILE, &json, D::REQUIRES_EDUCATION)
        }
        None => ContentTables::from_json(D::CONTENT_FILE, D::BUNDLED_CONTENT, D::REQUIRES_EDUCATION),
    }
}
