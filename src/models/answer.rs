// src/models/answer.rs

use std::fmt;

use serde::{Serialize, Serializer};
use validator::Validate;

use crate::models::question::OptionCode;

/// The answer to one question, as fed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Code(OptionCode),
    Unanswered,
}

impl Answer {
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Code(code) => code.as_str(),
            Answer::Unanswered => "UNANSWERED",
        }
    }

    pub fn code(self) -> Option<OptionCode> {
        match self {
            Answer::Code(code) => Some(code),
            Answer::Unanswered => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// DTO for choosing an option.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct SelectAnswerRequest {
    /// Position of the question in the shuffled sequence.
    pub position: usize,

    /// The display string exactly as rendered (e.g. "B. Go to the library").
    #[validate(length(max = 1000))]
    pub choice: String,
}

#[derive(Debug, Serialize)]
pub struct SelectAnswerResponse {
    pub position: usize,
    pub answer: Answer,
}
