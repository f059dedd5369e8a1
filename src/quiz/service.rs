// src/quiz/service.rs

use tokio::sync::Mutex;

use crate::{
    error::AppError,
    ml::pipeline::complete,
    models::submission::{PredictionResult, SubmitResponse},
    quiz::{
        recorder::{SubmissionSink, record_submission},
        session::QuizSession,
    },
    state::QuizResources,
};

const RECORDING_FAILED: &str =
    "Your result could not be saved. It is shown below, but it was not recorded.";

/// Runs the pipeline on the session's answers and moves it to `Submitted`.
///
/// Fails without touching the session when the name or an answer is
/// missing, or when the model rejects the answers.
pub fn predict_for_session(
    session: &mut QuizSession,
    resources: &QuizResources,
) -> Result<PredictionResult, AppError> {
    if session.is_submitted() {
        return Err(AppError::Conflict(
            "Quiz already submitted. Reset to take it again.".to_string(),
        ));
    }
    if session.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Please enter your name to start the quiz!".to_string(),
        ));
    }

    let answers = session.answers(&resources.dataset);
    let raw_answers = complete(&answers)?;

    let character_label = resources.pipeline.predict_codes(&raw_answers).map_err(|e| {
        tracing::warn!("Prediction rejected for '{}': {}", session.name, e);
        AppError::from(e)
    })?;

    let result = PredictionResult {
        character_label,
        source_name: session.name.clone(),
        raw_answers,
    };
    session.mark_submitted(result.clone())?;

    Ok(result)
}

/// Submits the quiz and records it.
///
/// The session lock is released before the sink is called, and the result
/// is kept even when recording fails.
pub async fn submit(
    session: &Mutex<QuizSession>,
    resources: &QuizResources,
    sink: &dyn SubmissionSink,
) -> Result<SubmitResponse, AppError> {
    let result = {
        let mut session = session.lock().await;
        predict_for_session(&mut session, resources)?
    };

    let recorded = record_submission(sink, &result.to_row()).await;

    Ok(SubmitResponse {
        name: result.source_name,
        character: result.character_label,
        answers: result.raw_answers,
        recorded,
        warning: (!recorded).then(|| RECORDING_FAILED.to_string()),
    })
}
