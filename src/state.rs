use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    ml::pipeline::InferencePipeline,
    quiz::{dataset::QuizDataset, recorder::SubmissionSink, store::SessionStore},
};

/// Immutable resources loaded once at startup and shared by all sessions.
#[derive(Clone)]
pub struct QuizResources {
    pub dataset: QuizDataset,
    pub pipeline: InferencePipeline,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resources: Arc<QuizResources>,
    pub sessions: Arc<SessionStore>,
    pub sink: Arc<dyn SubmissionSink>,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuizResources> {
    fn from_ref(state: &AppState) -> Self {
        state.resources.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SubmissionSink> {
    fn from_ref(state: &AppState) -> Self {
        state.sink.clone()
    }
}
