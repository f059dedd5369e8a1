// src/error.rs

use std::fmt;
use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., answering after the quiz was submitted)
    Conflict(String),

    // 422 Unprocessable Entity (incomplete quiz, unseen answer code)
    Unprocessable(String),

    // 500, but the diagnostic is shown to the user
    ModelError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::ModelError(msg) => {
                tracing::error!("Model Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Startup failure while reading the quiz dataset or a model artifact.
/// Always fatal: the server never binds without its resources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid contents in '{}': {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure of a single prediction attempt. None of these end the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// 1-based numbers of the unanswered questions, in dataset order.
    #[error("please answer all questions before submitting (unanswered: {positions:?})")]
    Incomplete { positions: Vec<usize> },

    #[error("unseen answer '{code}' for question '{column}'")]
    UnseenCategory { column: String, code: String },

    #[error("label encoder for '{column}' not found; model features might not match")]
    MissingEncoder { column: String },

    #[error("prediction failed: {0}")]
    PredictionFailure(String),
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Incomplete { .. } | PredictError::UnseenCategory { .. } => {
                AppError::Unprocessable(err.to_string())
            }
            PredictError::MissingEncoder { .. } | PredictError::PredictionFailure(_) => {
                AppError::ModelError(err.to_string())
            }
        }
    }
}
