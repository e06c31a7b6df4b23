use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::models::MatchResultModel;
use super::service::LedgerService;
use super::types::{RecordMatchRequest, RecordMatchResponse, UndoResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for recording a match result
///
/// POST /results
/// Inserts one row per participant, all sharing one creation timestamp
#[instrument(name = "record_results", skip(state, request))]
pub async fn record_results(
    State(state): State<AppState>,
    Json(request): Json<RecordMatchRequest>,
) -> Result<Json<RecordMatchResponse>, AppError> {
    let service = LedgerService::new(
        Arc::clone(&state.ledger_repository),
        Arc::clone(&state.roster_repository),
    );

    let created_at = service
        .record_match_by_ids(
            request.game_date,
            &request.memo,
            &request.winners,
            &request.losers,
        )
        .await?;

    info!(
        winner_count = request.winners.len(),
        loser_count = request.losers.len(),
        "Match result recorded"
    );

    Ok(Json(RecordMatchResponse {
        created_at,
        winner_count: request.winners.len(),
        loser_count: request.losers.len(),
    }))
}

/// HTTP handler for undoing the most recent recording event
///
/// DELETE /results/latest
/// Removes every row of the newest batch, leaving earlier batches intact
#[instrument(name = "undo_last_results", skip(state))]
pub async fn undo_last_results(
    State(state): State<AppState>,
) -> Result<Json<UndoResponse>, AppError> {
    let service = LedgerService::new(
        Arc::clone(&state.ledger_repository),
        Arc::clone(&state.roster_repository),
    );

    let deleted_created_at = service.undo_last_batch().await?;

    info!(%deleted_created_at, "Last match batch undone");

    Ok(Json(UndoResponse { deleted_created_at }))
}

/// HTTP handler for the match history log
///
/// GET /results/history
/// Returns all ledger rows, newest game first
#[instrument(name = "list_results", skip(state))]
pub async fn list_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchResultModel>>, AppError> {
    let rows = state.ledger_repository.list_results().await?;
    info!(row_count = rows.len(), "Match history served");
    Ok(Json(rows))
}
