// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

/// Number of questions in the quiz. Also the number of model features.
pub const QUESTION_COUNT: usize = 5;

/// Feature columns in training order. Column `i` is the answer to question `i`
/// in dataset order, never in display order.
pub const FEATURE_COLUMNS: [&str; QUESTION_COUNT] = ["A1", "A2", "A3", "A4", "A5"];

/// First display entry of every question. Maps to `Answer::Unanswered`.
pub const PLACEHOLDER_OPTION: &str = "--- Please Select ---";

/// Longest player name kept, in characters, after markup is stripped.
pub const MAX_NAME_CHARS: usize = 50;

/// Image extensions tried, in priority order.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    /// Session lifetime in seconds. Applies to both the token and the stored state.
    pub session_ttl: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub quiz_data_path: PathBuf,
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
    pub target_encoder_path: PathBuf,
    pub image_dir: PathBuf,
    /// Public URL of the quiz, used in share links.
    pub app_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quiz_submissions.db?mode=rwc".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set");

        let session_ttl = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let app_url = env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000/".to_string());

        Self {
            database_url,
            session_secret,
            session_ttl,
            rust_log,
            bind_addr,
            quiz_data_path: path_var("QUIZ_DATA_PATH", "data/quiz_questions.json"),
            model_path: path_var("MODEL_PATH", "data/saved_model/random_forest_model.json"),
            encoder_path: path_var("ENCODER_PATH", "data/saved_model/label_encoders.json"),
            target_encoder_path: path_var(
                "TARGET_ENCODER_PATH",
                "data/saved_model/target_encoder.json",
            ),
            image_dir: path_var("IMAGE_DIR", "data/character_images"),
            app_url,
        }
    }
}

fn path_var(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
