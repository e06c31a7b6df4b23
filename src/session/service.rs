use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::SessionModel;
use super::repository::SessionRepository;
use super::token::{AdminCredential, TokenConfig};
use super::types::{LoginResponse, SessionClaims};
use crate::shared::AppError;

/// Service for admin login, token validation and logout.
pub struct SessionService {
    repository: Arc<dyn SessionRepository + Send + Sync>,
    token_config: TokenConfig,
    admin: AdminCredential,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
        admin: AdminCredential,
    ) -> Self {
        Self {
            repository,
            token_config,
            admin,
        }
    }

    /// Checks the admin password and, on success, registers a session and
    /// issues its JWT. A wrong password is a plain 401; retries are
    /// unlimited.
    #[instrument(skip(self, password))]
    pub async fn login(&self, password: &str) -> Result<LoginResponse, AppError> {
        if !self.admin.verify(password) {
            warn!("Admin login rejected");
            return Err(AppError::Unauthorized(
                "Wrong or unconfigured admin password".to_string(),
            ));
        }

        let session = SessionModel::new(self.token_config.expiration_days);
        self.repository.create_session(&session).await?;

        let token = self.token_config.create_token(session.id.clone())?;
        info!(session_id = %session.id, "Admin logged in");

        Ok(LoginResponse {
            token,
            expires_at: session.expires_at,
        })
    }

    /// Validates a bearer token against both its signature and the live
    /// session store.
    #[instrument(skip(self, token))]
    pub async fn validate(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims = self.token_config.validate_token(token)?;

        let session = self
            .repository
            .get_session(&claims.session_id)
            .await?
            .ok_or_else(|| {
                warn!(session_id = %claims.session_id, "Token references no live session");
                AppError::Unauthorized("Session no longer exists".to_string())
            })?;

        if session.is_expired() {
            self.repository.delete_session(&session.id).await.ok();
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        Ok(claims)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: &str) -> Result<(), AppError> {
        self.repository.delete_session(session_id).await?;
        info!(session_id = %session_id, "Admin logged out");
        Ok(())
    }
}
