use chrono::NaiveDate;
use serde::Deserialize;

/// Request payload for the public intake form. The cohort number is
/// computed server-side from the transfer date.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub student_name: String,
    pub student_id_number: String,
    pub player_name: String,
    pub faculty: String,
    pub gender: String,
    pub email: String,
    pub transfer_name: String,
    pub transfer_date: NaiveDate,
}
