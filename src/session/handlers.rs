use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::SessionService;
use super::types::{LoginRequest, LoginResponse, SessionClaims};
use crate::shared::{AppError, AppState};

fn session_service(state: &AppState) -> SessionService {
    SessionService::new(
        Arc::clone(&state.session_repository),
        state.token_config.clone(),
        state.admin.clone(),
    )
}

/// HTTP handler for the admin login
///
/// POST /session/login
/// Returns a bearer token for the admin-gated routes
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = session_service(&state).login(&request.password).await?;
    info!("Admin session issued");
    Ok(Json(response))
}

/// HTTP handler for the admin logout
///
/// POST /session/logout
#[instrument(name = "logout", skip(state, claims))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<serde_json::Value>, AppError> {
    session_service(&state).logout(&claims.session_id).await?;
    Ok(Json(serde_json::json!({ "logged_out": true })))
}
