// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{Config, MAX_NAME_CHARS},
    error::AppError,
    models::{
        answer::{SelectAnswerRequest, SelectAnswerResponse},
        submission::{SetNameRequest, StartSessionRequest},
    },
    quiz::{
        presenter, recorder::SubmissionSink, service, session::QuizSession, store::SessionStore,
    },
    state::QuizResources,
    utils::{html::clean_name, jwt::{SessionClaims, sign_session_token}},
};

/// Starts a new quiz session.
///
/// Returns 201 Created and a Bearer token identifying the session.
pub async fn start_session(
    State(sessions): State<Arc<SessionStore>>,
    State(config): State<Config>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let name = match payload.name.as_deref() {
        Some(raw) => player_name(raw)?,
        None => String::new(),
    };
    let session_id = sessions.create(QuizSession::new(name)).await;
    let token = sign_session_token(session_id, &config.session_secret, config.session_ttl)?;

    tracing::info!("Started quiz session {}", session_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "type": "Bearer",
            "expires_in": config.session_ttl
        })),
    ))
}

/// Renders the quiz for the current session.
///
/// Shuffles on the first call; later calls return the same order with the
/// stored selections restored.
pub async fn get_quiz(
    State(sessions): State<Arc<SessionStore>>,
    State(resources): State<Arc<QuizResources>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(claims.session_id()?).await?;
    let mut session = session.lock().await;

    let mut rng = StdRng::from_entropy();
    let questions = session.render(&resources.dataset, &mut rng);

    Ok(Json(json!({
        "name": session.name,
        "submitted": session.is_submitted(),
        "questions": questions
    })))
}

/// Sets the player's name.
pub async fn set_name(
    State(sessions): State<Arc<SessionStore>>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<SetNameRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let name = player_name(&payload.name)?;
    if name.is_empty() {
        return Err(AppError::BadRequest("Please enter your name.".to_string()));
    }

    let session = sessions.get(claims.session_id()?).await?;
    let mut session = session.lock().await;
    if session.is_submitted() {
        return Err(AppError::Conflict(
            "Quiz already submitted. Reset to take it again.".to_string(),
        ));
    }
    session.name = name;

    Ok(Json(json!({ "name": session.name })))
}

/// Records the option chosen for one question.
pub async fn select_answer(
    State(sessions): State<Arc<SessionStore>>,
    State(resources): State<Arc<QuizResources>>,
    Extension(claims): Extension<SessionClaims>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let session = sessions.get(claims.session_id()?).await?;
    let mut session = session.lock().await;

    let mut rng = StdRng::from_entropy();
    let answer = session.select(
        &resources.dataset,
        &mut rng,
        payload.position,
        &payload.choice,
    )?;

    Ok(Json(SelectAnswerResponse {
        position: payload.position,
        answer,
    }))
}

/// Submits the answers and returns the predicted character.
///
/// * Rejects incomplete quizzes and answers the model never saw (422).
/// * Saves the submission; a failed save is reported but does not hide the result.
pub async fn submit_quiz(
    State(sessions): State<Arc<SessionStore>>,
    State(resources): State<Arc<QuizResources>>,
    State(sink): State<Arc<dyn SubmissionSink>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(claims.session_id()?).await?;
    let response = service::submit(&session, &resources, sink.as_ref()).await?;

    Ok(Json(response))
}

/// Returns the result page of a submitted session.
pub async fn get_result(
    State(sessions): State<Arc<SessionStore>>,
    State(config): State<Config>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(claims.session_id()?).await?;
    let session = session.lock().await;

    let result = session
        .result()
        .ok_or(AppError::NotFound("Quiz has not been submitted yet".to_string()))?;

    let view = presenter::present(result, &config.image_dir, &config.app_url)?;
    Ok(Json(view))
}

/// Clears the session so the quiz can be taken again with a fresh shuffle.
pub async fn reset_quiz(
    State(sessions): State<Arc<SessionStore>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(claims.session_id()?).await?;
    session.lock().await.reset();

    Ok(Json(json!({ "message": "Quiz reset" })))
}

/// Strips markup from a submitted name and checks the length of what is kept.
fn player_name(raw: &str) -> Result<String, AppError> {
    let name = clean_name(raw);
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Name length must be between 1 and {} characters.",
            MAX_NAME_CHARS
        )));
    }
    Ok(name)
}
