use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// The club's founding year; cohort numbers count years since then.
pub const FOUNDING_YEAR: i32 = 2022;

/// Membership fee in yen, booked as income on approval.
pub const MEMBERSHIP_FEE_YEN: i32 = 5000;

/// Lifecycle of a membership request. PENDING is the only state an admin
/// can act on; APPROVED and REJECTED are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Database model for the membership_requests table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipRequestModel {
    pub id: String,
    pub student_name: String,
    pub student_id_number: String,
    pub player_name: String,
    pub faculty: String,
    pub gender: String,
    pub email: String,
    pub transfer_name: String,
    pub transfer_date: NaiveDate,
    pub term_number: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl MembershipRequestModel {
    /// Creates a pending request with a generated id and the cohort number
    /// computed from the transfer year.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        student_name: String,
        student_id_number: String,
        player_name: String,
        faculty: String,
        gender: String,
        email: String,
        transfer_name: String,
        transfer_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_name,
            student_id_number,
            player_name,
            faculty,
            gender,
            email,
            transfer_name,
            term_number: transfer_date.year() - FOUNDING_YEAR,
            transfer_date,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}
