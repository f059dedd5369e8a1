// src/quiz/session.rs

use std::collections::HashMap;

use rand::Rng;

use crate::{
    config::{PLACEHOLDER_OPTION, QUESTION_COUNT},
    error::AppError,
    models::{
        answer::Answer,
        question::RenderedQuestion,
        submission::PredictionResult,
    },
    quiz::{
        dataset::QuizDataset,
        shuffle::{DisplayOptions, ShuffleState},
    },
};

/// Lifecycle of a session's quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing drawn yet. The next render shuffles.
    #[default]
    Unshuffled,
    Shuffled(ShuffleState),
    /// Answers are frozen; the shuffle is kept so the quiz can still be shown.
    Submitted {
        shuffle: ShuffleState,
        result: PredictionResult,
    },
}

/// Chosen display strings keyed by dataset question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSelection {
    choices: HashMap<usize, String>,
}

impl AnswerSelection {
    pub fn get(&self, question: usize) -> Option<&str> {
        self.choices.get(&question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Everything one user's quiz needs between requests.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    pub name: String,
    phase: SessionPhase,
    selections: AnswerSelection,
}

impl QuizSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn selections(&self) -> &AnswerSelection {
        &self.selections
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            SessionPhase::Submitted { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, SessionPhase::Submitted { .. })
    }

    /// Produces the quiz as it should be shown now.
    ///
    /// Shuffles on first use; every later call returns the same order and
    /// labels, with the stored selections restored.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        dataset: &QuizDataset,
        rng: &mut R,
    ) -> Vec<RenderedQuestion> {
        let selections = &self.selections;
        let shuffle = ensure_shuffled(&mut self.phase, dataset.len(), rng);

        let order = shuffle.question_order().to_vec();
        order
            .into_iter()
            .enumerate()
            .filter_map(|(position, question)| {
                let record = dataset.question(question)?;
                let options = DisplayOptions::build(record, shuffle.option_order(question, rng));
                let selected = selections
                    .get(question)
                    .map(|display| options.index_of(display))
                    .unwrap_or(0);

                Some(RenderedQuestion {
                    position,
                    question: record.question_text.clone(),
                    options: options.strings(),
                    selected,
                })
            })
            .collect()
    }

    /// Stores the display string chosen for the question at `position`.
    ///
    /// Choosing the placeholder clears the selection. A string that is not
    /// one of the question's options is kept but resolves to `Unanswered`.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        dataset: &QuizDataset,
        rng: &mut R,
        position: usize,
        display: &str,
    ) -> Result<Answer, AppError> {
        if self.is_submitted() {
            return Err(AppError::Conflict(
                "Quiz already submitted. Reset to take it again.".to_string(),
            ));
        }

        let shuffle = ensure_shuffled(&mut self.phase, dataset.len(), rng);
        let (question, record) = shuffle
            .question_at(position)
            .and_then(|q| dataset.question(q).map(|record| (q, record)))
            .ok_or_else(|| AppError::BadRequest(format!("No question at position {}", position)))?;

        let options = DisplayOptions::build(record, shuffle.option_order(question, rng));
        let answer = options.answer_for(display);

        if display == PLACEHOLDER_OPTION {
            self.selections.choices.remove(&question);
        } else {
            self.selections.choices.insert(question, display.to_string());
        }

        Ok(answer)
    }

    /// Current answers in dataset question order.
    pub fn answers(&self, dataset: &QuizDataset) -> [Answer; QUESTION_COUNT] {
        let shuffle = match &self.phase {
            SessionPhase::Unshuffled => return [Answer::Unanswered; QUESTION_COUNT],
            SessionPhase::Shuffled(shuffle) | SessionPhase::Submitted { shuffle, .. } => shuffle,
        };

        let mut answers = [Answer::Unanswered; QUESTION_COUNT];
        for (question, slot) in answers.iter_mut().enumerate() {
            let (Some(display), Some(order), Some(record)) = (
                self.selections.get(question),
                shuffle.frozen_option_order(question),
                dataset.question(question),
            ) else {
                continue;
            };
            *slot = DisplayOptions::build(record, order).answer_for(display);
        }
        answers
    }

    /// Moves to `Submitted`. Only valid from `Shuffled`.
    pub fn mark_submitted(&mut self, result: PredictionResult) -> Result<(), AppError> {
        match std::mem::take(&mut self.phase) {
            SessionPhase::Shuffled(shuffle) => {
                self.phase = SessionPhase::Submitted { shuffle, result };
                Ok(())
            }
            other => {
                let submitted = matches!(other, SessionPhase::Submitted { .. });
                self.phase = other;
                if submitted {
                    Err(AppError::Conflict("Quiz already submitted.".to_string()))
                } else {
                    Err(AppError::BadRequest("Quiz has not been started.".to_string()))
                }
            }
        }
    }

    /// Forgets the shuffle, all selections, the result and the name.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Unshuffled;
        self.selections = AnswerSelection::default();
        self.name.clear();
    }
}

fn ensure_shuffled<'a, R: Rng + ?Sized>(
    phase: &'a mut SessionPhase,
    question_count: usize,
    rng: &mut R,
) -> &'a mut ShuffleState {
    match phase {
        SessionPhase::Shuffled(shuffle) | SessionPhase::Submitted { shuffle, .. } => shuffle,
        SessionPhase::Unshuffled => {
            tracing::debug!("Shuffling {} questions for session", question_count);
            *phase = SessionPhase::Shuffled(ShuffleState::new(question_count, rng));
            ensure_shuffled(phase, question_count, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{models::question::OptionCode, quiz::dataset::tests::sample_dataset};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Display string of the option with `code` in a rendered question.
    fn display_for(rendered: &RenderedQuestion, question: usize, code: OptionCode) -> String {
        let suffix = format!("q{}-{}", question + 1, code);
        rendered
            .options
            .iter()
            .find(|o| o.ends_with(&suffix))
            .cloned()
            .unwrap()
    }

    fn answer_all(session: &mut QuizSession, dataset: &QuizDataset, rng: &mut StdRng, code: OptionCode) {
        let view = session.render(dataset, rng);
        let order = match session.phase() {
            SessionPhase::Shuffled(s) => s.question_order().to_vec(),
            _ => panic!("expected shuffled"),
        };
        for (position, question) in order.into_iter().enumerate() {
            let display = display_for(&view[position], question, code);
            session.select(dataset, rng, position, &display).unwrap();
        }
    }

    #[test]
    fn test_rerender_is_identical() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::new("Luna");

        let first = session.render(&dataset, &mut rng);
        for _ in 0..10 {
            assert_eq!(session.render(&dataset, &mut rng), first);
        }
    }

    #[test]
    fn test_placeholder_first_and_labels_sequential() {
        let dataset = sample_dataset();
        let mut session = QuizSession::default();
        for question in session.render(&dataset, &mut rng()) {
            assert_eq!(question.options.len(), 6);
            assert_eq!(question.options[0], PLACEHOLDER_OPTION);
            for (idx, option) in question.options.iter().skip(1).enumerate() {
                let label = char::from(b'A' + idx as u8);
                assert!(option.starts_with(&format!("{}. ", label)));
            }
            assert_eq!(question.selected, 0);
        }
    }

    #[test]
    fn test_selection_restored_after_rerender() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::new("Luna");

        let view = session.render(&dataset, &mut rng);
        let chosen = view[2].options[4].clone();
        let answer = session.select(&dataset, &mut rng, 2, &chosen).unwrap();
        assert!(matches!(answer, Answer::Code(_)));

        // Answering another question re-renders the whole page.
        session.select(&dataset, &mut rng, 0, &view[0].options[1]).unwrap();

        let again = session.render(&dataset, &mut rng);
        assert_eq!(again[2].selected, 4);
        assert_eq!(again[2].options[4], chosen);
        assert_eq!(again[0].selected, 1);
    }

    #[test]
    fn test_answers_follow_dataset_order_not_display_order() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::new("Luna");

        let view = session.render(&dataset, &mut rng);
        let order = match session.phase() {
            SessionPhase::Shuffled(s) => s.question_order().to_vec(),
            _ => panic!("expected shuffled"),
        };

        // Answer dataset question q with the code at index q.
        for (position, question) in order.iter().enumerate() {
            let code = OptionCode::ALL[*question];
            let display = display_for(&view[position], *question, code);
            session.select(&dataset, &mut rng, position, &display).unwrap();
        }

        assert_eq!(session.answers(&dataset), OptionCode::ALL.map(Answer::Code));
    }

    #[test]
    fn test_placeholder_clears_and_unknown_restores_to_placeholder() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::default();

        let view = session.render(&dataset, &mut rng);
        session.select(&dataset, &mut rng, 1, &view[1].options[2]).unwrap();
        assert_eq!(session.selections().len(), 1);

        let cleared = session.select(&dataset, &mut rng, 1, PLACEHOLDER_OPTION).unwrap();
        assert_eq!(cleared, Answer::Unanswered);
        assert!(session.selections().is_empty());

        let unknown = session.select(&dataset, &mut rng, 1, "Z. not an option").unwrap();
        assert_eq!(unknown, Answer::Unanswered);
        assert_eq!(session.render(&dataset, &mut rng)[1].selected, 0);
        assert!(session.answers(&dataset).iter().all(|a| *a == Answer::Unanswered));
    }

    #[test]
    fn test_select_out_of_range_position() {
        let dataset = sample_dataset();
        let mut session = QuizSession::default();
        let err = session.select(&dataset, &mut rng(), 9, "A. x").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_submitted_session_is_frozen() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::new("Neville");
        answer_all(&mut session, &dataset, &mut rng, OptionCode::E);
        let before = session.render(&dataset, &mut rng);

        let result = PredictionResult {
            character_label: "Neville Longbottom".to_string(),
            source_name: "Neville".to_string(),
            raw_answers: [OptionCode::E; QUESTION_COUNT],
        };
        session.mark_submitted(result.clone()).unwrap();

        assert_eq!(session.result(), Some(&result));
        assert_eq!(session.render(&dataset, &mut rng), before);
        assert!(matches!(
            session.select(&dataset, &mut rng, 0, &before[0].options[1]),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            session.mark_submitted(result),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_ensure_shuffled_draws_once_and_keeps_submitted_order() {
        let mut rng = rng();
        let mut phase = SessionPhase::Unshuffled;

        let order = ensure_shuffled(&mut phase, QUESTION_COUNT, &mut rng)
            .question_order()
            .to_vec();
        assert!(matches!(phase, SessionPhase::Shuffled(_)));
        assert_eq!(
            ensure_shuffled(&mut phase, QUESTION_COUNT, &mut rng).question_order(),
            order.as_slice()
        );

        let SessionPhase::Shuffled(shuffle) = std::mem::take(&mut phase) else {
            panic!("expected shuffled");
        };
        let mut phase = SessionPhase::Submitted {
            shuffle,
            result: PredictionResult {
                character_label: "Ron Weasley".to_string(),
                source_name: "Ron".to_string(),
                raw_answers: [OptionCode::C; QUESTION_COUNT],
            },
        };
        assert_eq!(
            ensure_shuffled(&mut phase, QUESTION_COUNT, &mut rng).question_order(),
            order.as_slice()
        );
        assert!(matches!(phase, SessionPhase::Submitted { .. }));
    }

    #[test]
    fn test_mark_submitted_requires_started_quiz() {
        let mut session = QuizSession::default();
        let result = PredictionResult {
            character_label: "x".to_string(),
            source_name: "y".to_string(),
            raw_answers: [OptionCode::A; QUESTION_COUNT],
        };
        assert!(matches!(
            session.mark_submitted(result),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(session.phase(), &SessionPhase::Unshuffled);
    }

    #[test]
    fn test_reset_clears_everything() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::new("Ginny");
        answer_all(&mut session, &dataset, &mut rng, OptionCode::B);
        session
            .mark_submitted(PredictionResult {
                character_label: "Ron Weasley".to_string(),
                source_name: "Ginny".to_string(),
                raw_answers: [OptionCode::B; QUESTION_COUNT],
            })
            .unwrap();

        session.reset();

        assert_eq!(session.phase(), &SessionPhase::Unshuffled);
        assert!(session.selections().is_empty());
        assert!(session.result().is_none());
        assert!(session.name.is_empty());
        assert!(session.answers(&dataset).iter().all(|a| *a == Answer::Unanswered));
    }

    #[test]
    fn test_reset_reshuffles_independently() {
        let dataset = sample_dataset();
        let mut rng = rng();
        let mut session = QuizSession::default();

        let first = session.render(&dataset, &mut rng);
        let mut differed = false;
        for _ in 0..50 {
            session.reset();
            if session.render(&dataset, &mut rng) != first {
                differed = true;
                break;
            }
        }
        assert!(differed, "50 resets never produced a different shuffle");
    }
}
