use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside the admin JWT. The session id keys the GM session
/// store, so one browser session owns one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub session_id: String,
    pub exp: usize,
    pub iat: usize,
}

/// Request payload for the admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response for a successful admin login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
