use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::{MembershipRequestModel, RequestStatus, MEMBERSHIP_FEE_YEN};
use super::repository::MembershipRepository;
use super::types::JoinRequest;
use crate::ledger::models::TransactionModel;
use crate::ledger::repository::LedgerRepository;
use crate::roster::models::PlayerModel;
use crate::roster::repository::RosterRepository;
use crate::shared::AppError;

/// The institutional mail domain applicants must use.
const REQUIRED_EMAIL_DOMAIN: &str = "@keio.jp";

/// Service for the membership workflow: intake validation, admin approval
/// with its roster and finance side-effects, and rejection.
pub struct MembershipService {
    membership_repository: Arc<dyn MembershipRepository + Send + Sync>,
    roster_repository: Arc<dyn RosterRepository + Send + Sync>,
    ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
}

impl MembershipService {
    pub fn new(
        membership_repository: Arc<dyn MembershipRepository + Send + Sync>,
        roster_repository: Arc<dyn RosterRepository + Send + Sync>,
        ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
    ) -> Self {
        Self {
            membership_repository,
            roster_repository,
            ledger_repository,
        }
    }

    /// Validates the intake form and stores a PENDING request. Nothing is
    /// written on a validation failure.
    #[instrument(skip(self, request))]
    pub async fn submit(
        &self,
        request: JoinRequest,
    ) -> Result<MembershipRequestModel, AppError> {
        let required = [
            &request.student_name,
            &request.student_id_number,
            &request.player_name,
            &request.faculty,
            &request.gender,
            &request.email,
            &request.transfer_name,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::BadRequest(
                "All fields are required".to_string(),
            ));
        }
        if !request.email.contains(REQUIRED_EMAIL_DOMAIN) {
            return Err(AppError::BadRequest(format!(
                "A {} address is required",
                REQUIRED_EMAIL_DOMAIN
            )));
        }

        let model = MembershipRequestModel::new(
            request.student_name,
            request.student_id_number,
            request.player_name,
            request.faculty,
            request.gender,
            request.email,
            request.transfer_name,
            request.transfer_date,
        );
        self.membership_repository.insert_request(&model).await?;

        info!(
            request_id = %model.id,
            term_number = model.term_number,
            "Membership request submitted"
        );
        Ok(model)
    }

    /// Pending requests awaiting an admin decision, newest first.
    pub async fn pending(&self) -> Result<Vec<MembershipRequestModel>, AppError> {
        self.membership_repository.list_pending().await
    }

    /// Approves a pending request: adds the applicant to the roster, books
    /// the membership fee as income, and marks the request APPROVED.
    #[instrument(skip(self))]
    pub async fn approve(&self, id: &str) -> Result<MembershipRequestModel, AppError> {
        let mut request = self.require_pending(id).await?;

        self.roster_repository
            .insert_player(&PlayerModel::new(
                request.student_id_number.clone(),
                request.student_name.clone(),
            ))
            .await?;

        self.ledger_repository
            .insert_transaction(&TransactionModel {
                tx_type: "IN".to_string(),
                category: "入サー費".to_string(),
                amount: MEMBERSHIP_FEE_YEN,
                description: format!("新入生: {}", request.student_name),
                created_by: "Admin Approval".to_string(),
            })
            .await?;

        self.membership_repository
            .update_status(id, RequestStatus::Approved)
            .await?;
        request.status = RequestStatus::Approved;

        info!(request_id = %id, "Membership request approved");
        Ok(request)
    }

    /// Rejects a pending request. Terminal; nothing else changes.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: &str) -> Result<MembershipRequestModel, AppError> {
        let mut request = self.require_pending(id).await?;

        self.membership_repository
            .update_status(id, RequestStatus::Rejected)
            .await?;
        request.status = RequestStatus::Rejected;

        info!(request_id = %id, "Membership request rejected");
        Ok(request)
    }

    async fn require_pending(&self, id: &str) -> Result<MembershipRequestModel, AppError> {
        let request = self
            .membership_repository
            .get_request(id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Membership request not found".to_string())
            })?;
        if !request.is_pending() {
            warn!(request_id = %id, status = %request.status, "Request already decided");
            return Err(AppError::BadRequest(
                "This request has already been decided".to_string(),
            ));
        }
        Ok(request)
    }
}
