use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Request payload for recording a match from the standalone form.
/// Participants are roster ids; display names are resolved server-side.
#[derive(Debug, Deserialize)]
pub struct RecordMatchRequest {
    pub game_date: NaiveDate,
    #[serde(default)]
    pub memo: String,
    pub winners: Vec<String>,
    pub losers: Vec<String>,
}

/// Response for a recorded match batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordMatchResponse {
    pub created_at: DateTime<Utc>,
    pub winner_count: usize,
    pub loser_count: usize,
}

/// Response for the undo of the most recent batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResponse {
    pub deleted_created_at: DateTime<Utc>,
}
