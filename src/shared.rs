use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::game::GmSessionManager;
use crate::ledger::repository::LedgerRepository;
use crate::membership::repository::MembershipRepository;
use crate::roster::repository::RosterRepository;
use crate::schedule::EventSchedule;
use crate::session::repository::SessionRepository;
use crate::session::{AdminCredential, TokenConfig};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub roster_repository: Arc<dyn RosterRepository + Send + Sync>,
    pub ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
    pub membership_repository: Arc<dyn MembershipRepository + Send + Sync>,
    pub session_repository: Arc<dyn SessionRepository + Send + Sync>,
    pub gm_sessions: GmSessionManager,
    pub token_config: TokenConfig,
    pub admin: AdminCredential,
    pub schedule: EventSchedule,
}

impl AppState {
    pub fn new(
        roster_repository: Arc<dyn RosterRepository + Send + Sync>,
        ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
        membership_repository: Arc<dyn MembershipRepository + Send + Sync>,
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
    ) -> Self {
        Self {
            roster_repository,
            ledger_repository,
            membership_repository,
            session_repository,
            gm_sessions: GmSessionManager::new(),
            token_config: TokenConfig::new(),
            admin: AdminCredential::from_env(),
            schedule: EventSchedule::from_env(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::ledger::repository::InMemoryLedgerRepository;
    use crate::membership::repository::InMemoryMembershipRepository;
    use crate::roster::repository::InMemoryRosterRepository;
    use crate::session::repository::InMemorySessionRepository;
    use chrono::NaiveDate;

    /// Builder for creating AppState with overrides for testing. Everything
    /// defaults to an empty in-memory repository.
    pub struct AppStateBuilder {
        roster_repository: Option<Arc<dyn RosterRepository + Send + Sync>>,
        ledger_repository: Option<Arc<dyn LedgerRepository + Send + Sync>>,
        membership_repository: Option<Arc<dyn MembershipRepository + Send + Sync>>,
        session_repository: Option<Arc<dyn SessionRepository + Send + Sync>>,
        admin_password: Option<String>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                roster_repository: None,
                ledger_repository: None,
                membership_repository: None,
                session_repository: None,
                admin_password: None,
            }
        }

        pub fn with_roster_repository(
            mut self,
            repo: Arc<dyn RosterRepository + Send + Sync>,
        ) -> Self {
            self.roster_repository = Some(repo);
            self
        }

        pub fn with_ledger_repository(
            mut self,
            repo: Arc<dyn LedgerRepository + Send + Sync>,
        ) -> Self {
            self.ledger_repository = Some(repo);
            self
        }

        pub fn with_membership_repository(
            mut self,
            repo: Arc<dyn MembershipRepository + Send + Sync>,
        ) -> Self {
            self.membership_repository = Some(repo);
            self
        }

        pub fn with_session_repository(
            mut self,
            repo: Arc<dyn SessionRepository + Send + Sync>,
        ) -> Self {
            self.session_repository = Some(repo);
            self
        }

        pub fn with_admin_password(mut self, password: &str) -> Self {
            self.admin_password = Some(password.to_string());
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                roster_repository: self
                    .roster_repository
                    .unwrap_or_else(|| Arc::new(InMemoryRosterRepository::new())),
                ledger_repository: self
                    .ledger_repository
                    .unwrap_or_else(|| Arc::new(InMemoryLedgerRepository::new())),
                membership_repository: self
                    .membership_repository
                    .unwrap_or_else(|| Arc::new(InMemoryMembershipRepository::new())),
                session_repository: self
                    .session_repository
                    .unwrap_or_else(|| Arc::new(InMemorySessionRepository::new())),
                gm_sessions: GmSessionManager::new(),
                token_config: TokenConfig::new(),
                admin: match self.admin_password {
                    Some(password) => AdminCredential::with_password(&password),
                    None => AdminCredential::with_password("howl_admin"),
                },
                schedule: EventSchedule::new(NaiveDate::from_ymd_opt(2026, 2, 16).unwrap()),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
