use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::models::PlayerModel;
use crate::shared::{AppError, AppState};

/// HTTP handler for the active roster
///
/// GET /players/active
/// Returns active players only, as offered in the GM setup and result forms
#[instrument(name = "list_active_players", skip(state))]
pub async fn list_active_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = state.roster_repository.list_active().await?;
    info!(player_count = players.len(), "Active roster served");
    Ok(Json(players))
}

/// HTTP handler for the full roster, including deactivated players
///
/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = state.roster_repository.list_all().await?;
    info!(player_count = players.len(), "Full roster served");
    Ok(Json(players))
}

/// HTTP handler for deactivating a roster entry
///
/// POST /players/:student_id/deactivate
/// Players are never deleted, only flagged inactive
#[instrument(name = "deactivate_player", skip(state))]
pub async fn deactivate_player(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.roster_repository.deactivate(&student_id).await?;
    info!(student_id = %student_id, "Player deactivated");
    Ok(Json(serde_json::json!({ "student_id": student_id, "is_active": false })))
}
