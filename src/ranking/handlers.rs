use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::{LeaderboardEntry, RankingService};
use crate::shared::{AppError, AppState};

/// HTTP handler for the club leaderboard
///
/// GET /leaderboard
/// Returns ranked players with scores and percentile titles
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let service = RankingService::new(Arc::clone(&state.ledger_repository));
    let board = service.leaderboard().await?;

    info!(player_count = board.len(), "Leaderboard served");

    Ok(Json(board))
}
