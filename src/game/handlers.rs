use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::instrument;

use super::logic::NightActions;
use super::service::GmService;
use super::types::{CommitRequest, CommitResponse, ExecuteRequest, GmStateResponse, SetupRequest};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

fn gm_service(state: &AppState) -> GmService {
    GmService::new(
        state.gm_sessions.clone(),
        Arc::clone(&state.roster_repository),
        Arc::clone(&state.ledger_repository),
        state.admin.clone(),
    )
}

/// HTTP handler for the current GM view
///
/// GET /gm
/// Phase-specific state; a pending seer reveal is returned once and cleared
#[instrument(name = "gm_state", skip(state, claims))]
pub async fn get_state(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<GmStateResponse>, AppError> {
    let view = gm_service(&state).view(&claims.session_id).await?;
    Ok(Json(view))
}

/// HTTP handler for the setup transition
///
/// POST /gm/setup
/// Starts a game from roster ids and role counts
#[instrument(name = "gm_setup", skip(state, claims, request))]
pub async fn setup(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<GmStateResponse>, AppError> {
    let view = gm_service(&state).setup(&claims.session_id, request).await?;
    Ok(Json(view))
}

/// HTTP handler for the day-phase execution
///
/// POST /gm/execute
#[instrument(name = "gm_execute", skip(state, claims, request))]
pub async fn execute(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<GmStateResponse>, AppError> {
    let view = gm_service(&state)
        .execute(&claims.session_id, &request.student_id)
        .await?;
    Ok(Json(view))
}

/// HTTP handler for the night-phase resolution
///
/// POST /gm/night
#[instrument(name = "gm_night", skip(state, claims, actions))]
pub async fn night(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(actions): Json<NightActions>,
) -> Result<Json<GmStateResponse>, AppError> {
    let view = gm_service(&state)
        .night(&claims.session_id, &actions)
        .await?;
    Ok(Json(view))
}

/// HTTP handler for committing the result to the match ledger
///
/// POST /gm/commit
/// Requires the admin password re-entered in the request body
#[instrument(name = "gm_commit", skip(state, claims, request))]
pub async fn commit(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let response = gm_service(&state)
        .commit(&claims.session_id, request)
        .await?;
    Ok(Json(response))
}

/// HTTP handler for discarding the in-memory session
///
/// POST /gm/reset
#[instrument(name = "gm_reset", skip(state, claims))]
pub async fn reset(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<GmStateResponse>, AppError> {
    let view = gm_service(&state).reset(&claims.session_id).await?;
    Ok(Json(view))
}
