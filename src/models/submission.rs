// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{
    config::QUESTION_COUNT,
    models::question::OptionCode,
};

/// Outcome of a successful prediction. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub character_label: String,
    pub source_name: String,
    /// Answer codes in dataset question order.
    pub raw_answers: [OptionCode; QUESTION_COUNT],
}

impl PredictionResult {
    pub fn to_row(&self) -> SubmissionRow {
        let [a1, a2, a3, a4, a5] = self.raw_answers.map(|code| code.as_str().to_string());
        SubmissionRow {
            name: self.source_name.clone(),
            a1,
            a2,
            a3,
            a4,
            a5,
            predicted_character: self.character_label.clone(),
        }
    }
}

/// Flattened form of a prediction, as appended to `user_submissions`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub name: String,
    pub a1: String,
    pub a2: String,
    pub a3: String,
    pub a4: String,
    pub a5: String,
    pub predicted_character: String,
}

/// DTO for starting a session. The name may also be given later.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
}

/// DTO for setting the player's name.
#[derive(Debug, Deserialize, Validate)]
pub struct SetNameRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name length must be between 1 and 50 characters."
    ))]
    pub name: String,
}

/// Response for a submitted quiz.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub name: String,
    pub character: String,
    pub answers: [OptionCode; QUESTION_COUNT],
    /// Whether the submission reached the submissions table.
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
