use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use uuid::Uuid;

use fourc_scoring::{ScoreTable, Session};

/// A hosted calculator session. Never persisted.
pub struct SessionEntry {
    pub session: Session,
    pub created_at: Timestamp,
    pub last_used: Timestamp,
}

impl SessionEntry {
    pub fn new(session: Session, now: Timestamp) -> Self {
        Self {
            session,
            created_at: now,
            last_used: now,
        }
    }

    pub fn is_expired(&self, now: Timestamp, ttl: SignedDuration) -> bool {
        now.duration_since(self.last_used) >= ttl
    }
}

/// Shared application state, injected into all route handlers via Axum state.
///
/// The score table is shared read-only; each session's answers live only in
/// its own entry. Sessions idle for longer than `session_ttl` are dropped.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<ScoreTable>,
    pub sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    pub session_ttl: SignedDuration,
}

impl AppState {
    pub fn new(table: ScoreTable, session_ttl: SignedDuration) -> Self {
        Self {
            table: Arc::new(table),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            session_ttl,
        }
    }

    /// Drop every session idle since before `now - session_ttl`. Returns
    /// how many were dropped.
    pub async fn evict_expired(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.lock().await;
        evict(&mut sessions, now, self.session_ttl)
    }
}

pub(crate) fn evict(
    sessions: &mut HashMap<Uuid, SessionEntry>,
    now: Timestamp,
    ttl: SignedDuration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now, ttl));

    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::info!(evicted, active = sessions.len(), "idle sessions expired");
    }
    evicted
}
