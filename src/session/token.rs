use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_days: i64,
}

impl TokenConfig {
    pub fn new() -> Self {
        // Allow configuring expiration via env var, default to 1 day
        let expiration_days = std::env::var("SESSION_EXPIRATION_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            expiration_days,
        }
    }

    /// Creates a new JWT token for the given admin session
    #[instrument(skip(self, session_id))]
    pub fn create_token(&self, session_id: String) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::days(self.expiration_days)).timestamp() as usize;

        let claims = SessionClaims {
            session_id,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "JWT validation failed");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The single shared admin credential. Read from the environment; a missing
/// credential never authenticates anyone.
#[derive(Clone)]
pub struct AdminCredential {
    password: Option<String>,
}

impl AdminCredential {
    pub fn from_env() -> Self {
        Self {
            password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn with_password(password: &str) -> Self {
        Self {
            password: Some(password.to_string()),
        }
    }

    /// Compares the supplied password. Unlimited retries, no lockout.
    pub fn verify(&self, supplied: &str) -> bool {
        match &self.password {
            Some(configured) => configured == supplied,
            None => false,
        }
    }
}
