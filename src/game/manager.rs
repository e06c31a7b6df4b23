use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::logic::GmSession;

/// In-memory store of live GM sessions, keyed by the admin session id.
///
/// One browser session owns at most one game; nothing else can reach it, so
/// the lock only guards against the handlers' own Send bounds.
#[derive(Clone, Default)]
pub struct GmSessionManager {
    sessions: Arc<RwLock<HashMap<String, GmSession>>>,
}

impl GmSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, session_id: &str) -> Option<GmSession> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    pub async fn put(&self, session_id: &str, session: GmSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), session);
    }

    /// Discards the session entirely. Returns whether one existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    pub async fn has(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(session_id)
    }
}
