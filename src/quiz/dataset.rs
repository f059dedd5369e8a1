// src/quiz/dataset.rs

use std::path::Path;

use crate::{
    config::QUESTION_COUNT,
    error::LoadError,
    ml::artifacts::read_json,
    models::question::{QuestionRecord, QuestionRow},
};

/// The fixed question table. Row order is the feature order used by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDataset {
    questions: Vec<QuestionRecord>,
}

impl QuizDataset {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let rows: Vec<QuestionRow> = read_json(path)?;

        let questions = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_record().map_err(|reason| LoadError::Invalid {
                    path: path.to_path_buf(),
                    reason: format!("row {}: {}", i + 1, reason),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Self::new(questions).map_err(|reason| LoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::info!("Loaded {} quiz questions from '{}'", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, String> {
        if questions.len() != QUESTION_COUNT {
            return Err(format!(
                "expected {} questions, found {}",
                QUESTION_COUNT,
                questions.len()
            ));
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }
}
