// src/quiz/shuffle.rs

use std::collections::HashMap;

use rand::{Rng, seq::SliceRandom};

use crate::{
    config::PLACEHOLDER_OPTION,
    models::{answer::Answer, question::{OptionCode, QuestionRecord}},
};

/// Randomized presentation of the quiz for one session.
///
/// The question order is drawn once. Each question's option order is drawn
/// the first time that question is rendered and reused verbatim afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleState {
    question_order: Vec<usize>,
    option_orders: HashMap<usize, Vec<OptionCode>>,
}

impl ShuffleState {
    pub fn new<R: Rng + ?Sized>(question_count: usize, rng: &mut R) -> Self {
        let mut question_order: Vec<usize> = (0..question_count).collect();
        question_order.shuffle(rng);

        Self {
            question_order,
            option_orders: HashMap::new(),
        }
    }

    pub fn question_order(&self) -> &[usize] {
        &self.question_order
    }

    /// Dataset index of the question shown at `position`.
    pub fn question_at(&self, position: usize) -> Option<usize> {
        self.question_order.get(position).copied()
    }

    /// Option order for `question`, drawn on first use.
    pub fn option_order<R: Rng + ?Sized>(&mut self, question: usize, rng: &mut R) -> &[OptionCode] {
        self.option_orders.entry(question).or_insert_with(|| {
            let mut order = OptionCode::ALL.to_vec();
            order.shuffle(rng);
            order
        })
    }

    /// Option order for `question` if it has already been drawn.
    pub fn frozen_option_order(&self, question: usize) -> Option<&[OptionCode]> {
        self.option_orders.get(&question).map(Vec::as_slice)
    }
}

/// The selectable entries of one question on screen, in display order.
///
/// Entry 0 is the placeholder. The others are labelled A, B, C... by
/// position, regardless of the code behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    entries: Vec<(String, Answer)>,
}

impl DisplayOptions {
    pub fn build(record: &QuestionRecord, order: &[OptionCode]) -> Self {
        let mut entries = Vec::with_capacity(order.len() + 1);
        entries.push((PLACEHOLDER_OPTION.to_string(), Answer::Unanswered));

        for (idx, code) in order.iter().enumerate() {
            let label = char::from(b'A' + idx as u8);
            entries.push((
                format!("{}. {}", label, record.option_text(*code)),
                Answer::Code(*code),
            ));
        }

        Self { entries }
    }

    /// Index of `display`, or 0 (the placeholder) if it is not one of the entries.
    pub fn index_of(&self, display: &str) -> usize {
        self.entries
            .iter()
            .position(|(text, _)| text == display)
            .unwrap_or(0)
    }

    pub fn answer_for(&self, display: &str) -> Answer {
        self.entries[self.index_of(display)].1
    }

    pub fn strings(&self) -> Vec<String> {
        self.entries.iter().map(|(text, _)| text.clone()).collect()
    }
}
