use serde::Serialize;

use crate::models::SeverityTier;
use crate::predictor::Confidence;

use super::types::NormalizedInput;

/// Numeric condition for one scoring band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    AtLeast(f64),
    AtMost(f64),
    Below(f64),
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::AtLeast(bound) => value >= bound,
            Self::AtMost(bound) => value <= bound,
            Self::Below(bound) => value < bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBand {
    pub band: Band,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeveritySource {
    /// Confidence percentage of the prediction.
    Confidence,
    /// A normalized input field.
    Field(&'static str),
}

/// One additive component. Bands are checked in order; the first match
/// scores, the rest are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityCriterion {
    pub name: &'static str,
    pub source: SeveritySource,
    pub bands: &'static [ScoreBand],
}

impl SeverityCriterion {
    fn points(&self, value: f64) -> u32 {
        self.bands
            .iter()
            .find(|b| b.band.contains(value))
            .map_or(0, |b| b.points)
    }

    fn max_points(&self) -> u32 {
        self.bands.iter().map(|b| b.points).max().unwrap_or(0)
    }
}

/// Inclusive upper bounds of the Mild and Moderate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityCutpoints {
    pub mild_max: u32,
    pub moderate_max: u32,
}

/// Weighted additive severity score with tier cutpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityScale {
    pub criteria: &'static [SeverityCriterion],
    pub cutpoints: SeverityCutpoints,
}

impl SeverityScale {
    pub fn max_score(&self) -> u32 {
        self.criteria.iter().map(SeverityCriterion::max_points).sum()
    }

    pub fn tier(&self, score: u32) -> SeverityTier {
        if score <= self.cutpoints.mild_max {
            SeverityTier::Mild
        } else if score <= self.cutpoints.moderate_max {
            SeverityTier::Moderate
        } else {
            SeverityTier::Severe
        }
    }

    /// Score a non-baseline prediction. Criteria whose field is absent
    /// contribute nothing.
    pub fn score(&self, confidence: &Confidence, input: &NormalizedInput) -> SeverityAssessment {
        let components: Vec<SeverityComponent> = self
            .criteria
            .iter()
            .filter_map(|criterion| {
                let value = match criterion.source {
                    SeveritySource::Confidence => confidence.value,
                    SeveritySource::Field(key) => input.get(key)?,
                };
                Some(SeverityComponent {
                    criterion: criterion.name,
                    value,
                    points: criterion.points(value),
                })
            })
            .collect();
        let score = components.iter().map(|c| c.points).sum();

        SeverityAssessment {
            tier: self.tier(score),
            score: Some(score),
            max_score: Some(self.max_score()),
            components,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityComponent {
    pub criterion: &'static str,
    pub value: f64,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityAssessment {
    pub tier: SeverityTier,
    pub score: Option<u32>,
    pub max_score: Option<u32>,
    pub components: Vec<SeverityComponent>,
}

impl SeverityAssessment {
    /// Baseline prediction: no disorder, so nothing is scored.
    pub fn baseline() -> Self {
        Self {
            tier: SeverityTier::None,
            score: None,
            max_score: None,
            components: Vec::new(),
        }
    }
}
