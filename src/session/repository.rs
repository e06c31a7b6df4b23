use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::SessionModel;
use crate::shared::AppError;

/// Trait for admin session storage
#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError>;
}

/// In-memory session store. Admin sessions are process-scoped by design:
/// nothing survives a restart and nothing is shared across instances.
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session already exists");
            return Err(AppError::DatabaseError(
                "Session already exists".to_string(),
            ));
        }
        sessions.insert(session.id.clone(), session.clone());
        debug!(session_id = %session.id, "Admin session created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: &str) -> Result<Option<SessionModel>, AppError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion");
            return Err(AppError::NotFound("Session not found".to_string()));
        }
        debug!(session_id = %session_id, "Admin session deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let now = Utc::now();
        let initial_count = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let removed = (initial_count - sessions.len()) as u64;
        debug!(expired_sessions_removed = removed, "Expired sessions cleaned up");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn expired_session() -> SessionModel {
        let mut session = SessionModel::new(1);
        session.expires_at = Utc::now() - Duration::hours(1);
        session
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let repo = InMemorySessionRepository::new();
        let session = SessionModel::new(1);

        repo.create_session(&session).await.unwrap();

        let retrieved = repo.get_session(&session.id).await.unwrap();
        assert_eq!(retrieved.unwrap().id, session.id);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let repo = InMemorySessionRepository::new();
        let session = SessionModel::new(1);
        repo.create_session(&session).await.unwrap();

        repo.delete_session(&session.id).await.unwrap();
        assert!(repo.get_session(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_session() {
        let repo = InMemorySessionRepository::new();
        let result = repo.delete_session("nonexistent-id").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let repo = InMemorySessionRepository::new();
        let valid = SessionModel::new(1);
        repo.create_session(&expired_session()).await.unwrap();
        repo.create_session(&valid).await.unwrap();

        let removed = repo.cleanup_expired_sessions().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.session_count(), 1);
        assert!(repo.get_session(&valid.id).await.unwrap().is_some());
    }
}
