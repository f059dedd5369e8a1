// src/quiz/recorder.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{error::AppError, models::submission::SubmissionRow};

/// Append-only destination for submissions.
///
/// No transactional guarantees are required; concurrent writers may race.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn append_row(&self, row: &SubmissionRow) -> Result<(), AppError>;
}

/// Writes submissions to the `user_submissions` table.
#[derive(Clone)]
pub struct SqliteSubmissionSink {
    pool: SqlitePool,
}

impl SqliteSubmissionSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionSink for SqliteSubmissionSink {
    async fn append_row(&self, row: &SubmissionRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_submissions (name, a1, a2, a3, a4, a5, predicted_character, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.name)
        .bind(&row.a1)
        .bind(&row.a2)
        .bind(&row.a3)
        .bind(&row.a4)
        .bind(&row.a5)
        .bind(&row.predicted_character)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Appends `row`, reporting success as a flag. Failures are logged, never raised.
pub async fn record_submission(sink: &dyn SubmissionSink, row: &SubmissionRow) -> bool {
    match sink.append_row(row).await {
        Ok(()) => {
            tracing::info!(
                "Recorded submission for '{}' as {}",
                row.name,
                row.predicted_character
            );
            true
        }
        Err(e) => {
            tracing::error!("Failed to save submission for '{}': {:?}", row.name, e);
            false
        }
    }
}
