use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the match_results table. Rows are immutable once written; the
/// only removal path is the undo of a whole batch by its `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultModel {
    pub game_date: NaiveDate,
    pub student_id: String,
    pub player_name: String,
    /// 1 = win, 0 = loss.
    pub is_win: i16,
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

impl MatchResultModel {
    pub fn won(&self) -> bool {
        self.is_win == 1
    }
}

/// A row to be inserted; `created_at` is stamped by the repository so that
/// every row of one batch shares the same timestamp.
#[derive(Debug, Clone)]
pub struct NewMatchResult {
    pub game_date: NaiveDate,
    pub student_id: String,
    pub player_name: String,
    pub is_win: i16,
    pub memo: String,
}

/// One participant of a match being recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub student_id: String,
    pub player_name: String,
}

/// One row of the transactions finance ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionModel {
    /// "IN" for income, "OUT" for expenses.
    pub tx_type: String,
    pub category: String,
    pub amount: i32,
    pub description: String,
    pub created_by: String,
}
