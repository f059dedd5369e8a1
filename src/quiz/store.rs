// src/quiz/store.rs

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{error::AppError, quiz::session::QuizSession};

struct SessionEntry {
    session: Arc<Mutex<QuizSession>>,
    created_at: Instant,
}

/// Registry of live sessions.
///
/// Each session sits behind its own lock and is only reachable through its
/// id; nothing here is shared between sessions except the map itself.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Starts a new session and drops any that have expired.
    pub async fn create(&self, session: QuizSession) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                created_at: Instant::now(),
            },
        );
        id
    }

    /// Looks up a live session. An expired entry is removed on the way out.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<QuizSession>>, AppError> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(entry) if entry.created_at.elapsed() < self.ttl => {
                    return Ok(entry.session.clone());
                }
                Some(_) => {}
                None => return Err(session_not_found()),
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&id)
            .is_some_and(|entry| entry.created_at.elapsed() >= self.ttl)
        {
            sessions.remove(&id);
            tracing::debug!("Purged expired session {}", id);
        }
        Err(session_not_found())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_not_found() -> AppError {
    AppError::NotFound("Session not found or expired. Start a new quiz.".to_string())
}
