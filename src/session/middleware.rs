use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{instrument, warn};

use super::service::SessionService;
use crate::shared::{AppError, AppState};

/// Admin authentication middleware - validates the Authorization Bearer
/// header and adds SessionClaims to the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), session::admin_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn admin_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let service = SessionService::new(
        Arc::clone(&state.session_repository),
        state.token_config.clone(),
        state.admin.clone(),
    );

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header on admin route");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = service.validate(token).await?;

    // Add claims to request extensions for handlers to use
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
