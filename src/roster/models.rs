use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the players roster table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerModel {
    pub student_id: String,
    pub name: String,
    pub is_active: bool,
}

impl PlayerModel {
    /// Creates an active roster entry. Players are deactivated later, never
    /// deleted.
    pub fn new(student_id: String, name: String) -> Self {
        Self {
            student_id,
            name,
            is_active: true,
        }
    }
}
