use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MembershipRequestModel, RequestStatus};
use crate::shared::AppError;

/// Trait for membership-request repository operations
#[async_trait]
pub trait MembershipRepository {
    async fn insert_request(&self, request: &MembershipRequestModel) -> Result<(), AppError>;
    async fn get_request(&self, id: &str) -> Result<Option<MembershipRequestModel>, AppError>;
    /// Pending requests only, newest first.
    async fn list_pending(&self) -> Result<Vec<MembershipRequestModel>, AppError>;
    async fn update_status(&self, id: &str, status: RequestStatus) -> Result<(), AppError>;
}

/// In-memory implementation of MembershipRepository for development and testing
pub struct InMemoryMembershipRepository {
    requests: Mutex<HashMap<String, MembershipRequestModel>>,
}

impl Default for InMemoryMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    #[instrument(skip(self, request))]
    async fn insert_request(&self, request: &MembershipRequestModel) -> Result<(), AppError> {
        let mut requests = self.requests.lock().unwrap();
        requests.insert(request.id.clone(), request.clone());
        debug!(request_id = %request.id, "Membership request stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_request(&self, id: &str) -> Result<Option<MembershipRequestModel>, AppError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_pending(&self) -> Result<Vec<MembershipRequestModel>, AppError> {
        let requests = self.requests.lock().unwrap();
        let mut pending: Vec<MembershipRequestModel> = requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &str, status: RequestStatus) -> Result<(), AppError> {
        let mut requests = self.requests.lock().unwrap();
        match requests.get_mut(id) {
            Some(request) => {
                request.status = status;
                debug!(request_id = %id, %status, "Membership request status updated");
                Ok(())
            }
            None => {
                warn!(request_id = %id, "Membership request not found");
                Err(AppError::NotFound("Membership request not found".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of membership repository
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_request(row: &sqlx::postgres::PgRow) -> Result<MembershipRequestModel, AppError> {
        let status: String = row.get("status");
        Ok(MembershipRequestModel {
            id: row.get("id"),
            student_name: row.get("student_name"),
            student_id_number: row.get("student_id_number"),
            player_name: row.get("player_name"),
            faculty: row.get("faculty"),
            gender: row.get("gender"),
            email: row.get("email"),
            transfer_name: row.get("transfer_name"),
            transfer_date: row.get("transfer_date"),
            term_number: row.get("term_number"),
            status: RequestStatus::from_str(&status)
                .map_err(|_| AppError::DatabaseError(format!("Bad status value: {}", status)))?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    #[instrument(skip(self, request))]
    async fn insert_request(&self, request: &MembershipRequestModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO membership_requests \
             (id, student_name, student_id_number, player_name, faculty, gender, email, \
              transfer_name, transfer_date, term_number, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&request.id)
        .bind(&request.student_name)
        .bind(&request.student_id_number)
        .bind(&request.player_name)
        .bind(&request.faculty)
        .bind(&request.gender)
        .bind(&request.email)
        .bind(&request.transfer_name)
        .bind(request.transfer_date)
        .bind(request.term_number)
        .bind(request.status.to_string())
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert membership request");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(request_id = %request.id, "Membership request stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_request(&self, id: &str) -> Result<Option<MembershipRequestModel>, AppError> {
        let row = sqlx::query("SELECT * FROM membership_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch membership request");
                AppError::DatabaseError(e.to_string())
            })?;

        row.as_ref().map(Self::row_to_request).transpose()
    }

    #[instrument(skip(self))]
    async fn list_pending(&self) -> Result<Vec<MembershipRequestModel>, AppError> {
        let rows = sqlx::query(
            "SELECT * FROM membership_requests WHERE status = 'PENDING' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list pending membership requests");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(Self::row_to_request).collect()
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &str, status: RequestStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE membership_requests SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to update membership request status");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(request_id = %id, "Membership request not found");
            return Err(AppError::NotFound(
                "Membership request not found".to_string(),
            ));
        }

        debug!(request_id = %id, %status, "Membership request status updated");
        Ok(())
    }
}
