// src/models/question.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed answer code of an option, as used by the model.
/// Independent of the letter the option is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionCode {
    A,
    B,
    C,
    D,
    E,
}

impl OptionCode {
    pub const ALL: [OptionCode; 5] = [
        OptionCode::A,
        OptionCode::B,
        OptionCode::C,
        OptionCode::D,
        OptionCode::E,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionCode::A => "A",
            OptionCode::B => "B",
            OptionCode::C => "C",
            OptionCode::D => "D",
            OptionCode::E => "E",
        }
    }
}

impl fmt::Display for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the quiz dataset, as stored on disk.
/// Column names follow the spreadsheet the questions were authored in.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRow {
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Option A")]
    pub option_a: String,
    #[serde(rename = "Option B")]
    pub option_b: String,
    #[serde(rename = "Option C")]
    pub option_c: String,
    #[serde(rename = "Option D")]
    pub option_d: String,
    #[serde(rename = "Option E")]
    pub option_e: String,
}

impl QuestionRow {
    /// Checks that no text is blank and converts into a record.
    pub fn into_record(self) -> Result<QuestionRecord, String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }

        let options = [
            self.option_a,
            self.option_b,
            self.option_c,
            self.option_d,
            self.option_e,
        ];

        if let Some(code) = OptionCode::ALL
            .iter()
            .find(|code| options[code.index()].trim().is_empty())
        {
            return Err(format!(
                "option {} of question '{}' is empty",
                code, self.question
            ));
        }

        Ok(QuestionRecord {
            question_text: self.question,
            options,
        })
    }
}

/// A loaded quiz question. Its identity is its row position in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question_text: String,
    options: [String; 5],
}

impl QuestionRecord {
    pub fn new(question_text: impl Into<String>, options: [String; 5]) -> Self {
        Self {
            question_text: question_text.into(),
            options,
        }
    }

    pub fn option_text(&self, code: OptionCode) -> &str {
        &self.options[code.index()]
    }

    /// Options in fixed code order A..E.
    pub fn options(&self) -> impl Iterator<Item = (OptionCode, &str)> {
        OptionCode::ALL
            .into_iter()
            .map(move |code| (code, self.option_text(code)))
    }
}

/// A question as shown to the user on one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedQuestion {
    /// Position in the shuffled sequence. Used to address the question when answering.
    pub position: usize,

    pub question: String,

    /// Display strings. Index 0 is always the placeholder.
    pub options: Vec<String>,

    /// Index into `options` of the current selection (0 when nothing is selected).
    pub selected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(question: &str, e: &str) -> QuestionRow {
        QuestionRow {
            question: question.to_string(),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            option_e: e.to_string(),
        }
    }

    #[test]
    fn test_into_record_keeps_code_order() {
        let record = row("Pick one", "e").into_record().unwrap();
        let codes: Vec<(OptionCode, &str)> = record.options().collect();
        assert_eq!(codes[0], (OptionCode::A, "a"));
        assert_eq!(codes[4], (OptionCode::E, "e"));
        assert_eq!(record.option_text(OptionCode::C), "c");
    }

    #[test]
    fn test_into_record_rejects_blank_option() {
        let err = row("Pick one", "  ").into_record().unwrap_err();
        assert!(err.contains("option E"));
    }

    #[test]
    fn test_into_record_rejects_blank_question() {
        assert!(row("", "e").into_record().is_err());
    }

    #[test]
    fn test_row_deserializes_from_spreadsheet_columns() {
        let json = r#"{
            "Question": "Q",
            "Option A": "1", "Option B": "2", "Option C": "3",
            "Option D": "4", "Option E": "5"
        }"#;
        let row: QuestionRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.option_d, "4");
    }
}
