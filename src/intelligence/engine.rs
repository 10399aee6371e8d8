use std::marker::PhantomData;
use std::time::Instant;

use crate::domains::Domain;
use crate::models::Keyed;
use crate::predictor::{ModelSlot, ModelState, PredictorError};

use super::explain::{explain, ExplainError};
use super::normalize::normalize;
use super::reference::ContentTables;
use super::report::{assemble, AssessmentReport, AssessmentStamp};
use super::types::{AssessmentError, RawInput};

/// Synchronous assessment pipeline for one domain:
/// normalize → predict → explain → assemble.
pub struct Assessor<D: Domain> {
    model: ModelSlot,
    content: ContentTables<D::Class, D::Factor>,
    _domain: PhantomData<fn() -> D>,
}

impl<D: Domain> Assessor<D> {
    pub fn new(model: ModelSlot, content: ContentTables<D::Class, D::Factor>) -> Self {
        Self {
            model,
            content,
            _domain: PhantomData,
        }
    }

    pub fn model_state(&self) -> ModelState {
        self.model.state()
    }

    pub fn assess(
        &self,
        raw: &RawInput,
    ) -> Result<AssessmentReport<D::Class, D::Factor>, AssessmentError> {
        self.assess_with(raw, AssessmentStamp::now())
    }

    /// Run the pipeline with a caller-chosen id and timestamp.
    pub fn assess_with(
        &self,
        raw: &RawInput,
        stamp: AssessmentStamp,
    ) -> Result<AssessmentReport<D::Class, D::Factor>, AssessmentError> {
        let start = Instant::now();

        let input = normalize::<D>(raw)?;
        let model = self.model.get()?;
        let prediction = model.predict(&input.features)?;
        let class = D::Class::ALL
            .get(prediction.class_index)
            .copied()
            .ok_or(PredictorError::UnknownClass {
                index: prediction.class_index,
                classes: D::Class::ALL.len(),
            })?;

        let breakdown = match explain(model.as_ref(), &input.features) {
            Ok(breakdown) => Some(breakdown),
            Err(ExplainError::UnsupportedModelKind(e)) => {
                tracing::debug!(domain = D::NAME, reason = %e, "Contribution section omitted");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let report = assemble::<D>(
            stamp,
            model.metadata(),
            class,
            &prediction,
            input,
            breakdown,
            &self.content,
        );

        tracing::info!(
            domain = D::NAME,
            assessment_id = %report.assessment_id,
            prediction = %report.prediction.key(),
            confidence = report.confidence.value,
            flags = report.risk_factor_count,
            processing_ms = start.elapsed().as_millis() as u64,
            "Assessment complete"
        );

        Ok(report)
    }
}
