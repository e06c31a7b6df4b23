use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::logic::{AlignmentReveal, GameEvent, Phase};
use super::roles::{Role, RoleConfig, Team};

/// Request payload for starting a game: roster ids plus the role counts.
#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub participants: Vec<String>,
    pub roles: RoleConfig,
}

/// Request payload for the day-phase execution.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub student_id: String,
}

/// Request payload for committing the result to the ledger. Winners and
/// losers default from the teams but can be overridden in the form.
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub password: String,
    pub game_date: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
    pub winners: Vec<String>,
    pub losers: Vec<String>,
}

/// One participant as shown on the GM panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub student_id: String,
    pub name: String,
    pub role: Role,
    pub team: Team,
    pub alive: bool,
}

/// Phase-specific view of the running session. `divination` is consumed by
/// the read that returns it; `medium_report` recomputes on every day view.
#[derive(Debug, Serialize, Deserialize)]
pub struct GmStateResponse {
    pub phase: Phase,
    pub turn: u32,
    pub players: Vec<PlayerView>,
    pub log: Vec<String>,
    pub events: Vec<GameEvent>,
    pub divination: Option<AlignmentReveal>,
    pub medium_report: Option<AlignmentReveal>,
    pub winner: Option<Team>,
    pub default_winners: Vec<String>,
    pub default_losers: Vec<String>,
}

/// Response after the result has been written to the match ledger.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResponse {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub winner_count: usize,
    pub loser_count: usize,
}
