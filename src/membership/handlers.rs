use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::models::MembershipRequestModel;
use super::service::MembershipService;
use super::types::JoinRequest;
use crate::shared::{AppError, AppState};

fn membership_service(state: &AppState) -> MembershipService {
    MembershipService::new(
        Arc::clone(&state.membership_repository),
        Arc::clone(&state.roster_repository),
        Arc::clone(&state.ledger_repository),
    )
}

/// HTTP handler for the public intake form
///
/// POST /membership
/// Validates the application and stores it as PENDING
#[instrument(name = "submit_membership", skip(state, request))]
pub async fn submit_membership(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<MembershipRequestModel>, AppError> {
    let stored = membership_service(&state).submit(request).await?;
    info!(request_id = %stored.id, "Membership application received");
    Ok(Json(stored))
}

/// HTTP handler for the admin approval queue
///
/// GET /membership/pending
#[instrument(name = "list_pending_membership", skip(state))]
pub async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipRequestModel>>, AppError> {
    let pending = membership_service(&state).pending().await?;
    info!(pending_count = pending.len(), "Pending applications served");
    Ok(Json(pending))
}

/// HTTP handler for approving an application
///
/// POST /membership/:id/approve
/// Adds the applicant to the roster and books the membership fee
#[instrument(name = "approve_membership", skip(state))]
pub async fn approve_membership(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MembershipRequestModel>, AppError> {
    let approved = membership_service(&state).approve(&id).await?;
    Ok(Json(approved))
}

/// HTTP handler for rejecting an application
///
/// POST /membership/:id/reject
#[instrument(name = "reject_membership", skip(state))]
pub async fn reject_membership(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MembershipRequestModel>, AppError> {
    let rejected = membership_service(&state).reject(&id).await?;
    Ok(Json(rejected))
}
