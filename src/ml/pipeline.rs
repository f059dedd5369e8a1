// src/ml/pipeline.rs

use std::sync::Arc;

use crate::{
    config::{FEATURE_COLUMNS, QUESTION_COUNT},
    error::PredictError,
    ml::{
        encoder::{FeatureEncoderSet, TargetDecoder},
        forest::Classifier,
    },
    models::{answer::Answer, question::OptionCode},
};

/// Encode → predict → decode over the trained artifacts.
///
/// Holds no mutable state; one instance is shared by every session.
#[derive(Clone)]
pub struct InferencePipeline {
    encoders: FeatureEncoderSet,
    classifier: Arc<dyn Classifier>,
    target: TargetDecoder,
}

impl InferencePipeline {
    pub fn new(
        encoders: FeatureEncoderSet,
        classifier: Arc<dyn Classifier>,
        target: TargetDecoder,
    ) -> Self {
        Self {
            encoders,
            classifier,
            target,
        }
    }

    /// Maps five answers, in dataset question order, to a character name.
    pub fn predict(&self, answers: &[Answer; QUESTION_COUNT]) -> Result<String, PredictError> {
        let codes = complete(answers)?;
        self.predict_codes(&codes)
    }

    /// Same as `predict`, for answers already known to be complete.
    pub fn predict_codes(&self, codes: &[OptionCode; QUESTION_COUNT]) -> Result<String, PredictError> {
        let row = self.encode(codes)?;

        let label = self
            .classifier
            .predict(&row)
            .map_err(PredictError::PredictionFailure)?;

        let character = self.target.decode(label).ok_or_else(|| {
            PredictError::PredictionFailure(format!(
                "label {} is outside the {} trained characters",
                label,
                self.target.labels().len()
            ))
        })?;

        tracing::debug!(?codes, label, character, "Prediction complete");
        Ok(character.to_string())
    }

    /// Builds the feature row in training column order.
    pub fn encode(&self, codes: &[OptionCode; QUESTION_COUNT]) -> Result<Vec<f64>, PredictError> {
        FEATURE_COLUMNS
            .iter()
            .zip(codes)
            .map(|(column, code)| {
                let encoder = self
                    .encoders
                    .get(column)
                    .ok_or_else(|| PredictError::MissingEncoder {
                        column: column.to_string(),
                    })?;

                encoder
                    .transform(code.as_str())
                    .map(|encoded| encoded as f64)
                    .ok_or_else(|| PredictError::UnseenCategory {
                        column: column.to_string(),
                        code: code.to_string(),
                    })
            })
            .collect()
    }
}

/// Rejects the attempt if any question is unanswered.
pub fn complete(
    answers: &[Answer; QUESTION_COUNT],
) -> Result<[OptionCode; QUESTION_COUNT], PredictError> {
    let positions: Vec<usize> = answers
        .iter()
        .enumerate()
        .filter(|(_, a)| a.code().is_none())
        .map(|(i, _)| i + 1)
        .collect();

    if !positions.is_empty() {
        return Err(PredictError::Incomplete { positions });
    }

    let mut codes = [OptionCode::A; QUESTION_COUNT];
    for (slot, answer) in codes.iter_mut().zip(answers) {
        if let Answer::Code(code) = answer {
            *slot = *code;
        }
    }
    Ok(codes)
}
