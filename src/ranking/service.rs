use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::score::{competition_ranks, score, Tier};
use crate::ledger::repository::LedgerRepository;
use crate::shared::AppError;

/// One row of the leaderboard, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub title: String,
    pub student_id: String,
    pub player_name: String,
    /// Score rounded to the nearest integer for display.
    pub score: i64,
    pub wins: u32,
    pub games: u32,
}

/// Builds the ranked leaderboard from the match ledger.
pub struct RankingService {
    ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
}

impl RankingService {
    pub fn new(ledger_repository: Arc<dyn LedgerRepository + Send + Sync>) -> Self {
        Self { ledger_repository }
    }

    /// Groups ledger rows by student id, scores each player and assigns
    /// competition ranks and percentile titles.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        let rows = self.ledger_repository.list_results().await?;

        // student_id -> (display name, wins, games)
        let mut stats: HashMap<String, (String, u32, u32)> = HashMap::new();
        for row in &rows {
            let entry = stats
                .entry(row.student_id.clone())
                .or_insert_with(|| (row.player_name.clone(), 0, 0));
            if row.won() {
                entry.1 += 1;
            }
            entry.2 += 1;
        }

        let mut players: Vec<(String, String, u32, u32, f64)> = stats
            .into_iter()
            .map(|(student_id, (player_name, wins, games))| {
                let s = score(wins, games);
                (student_id, player_name, wins, games, s)
            })
            .collect();

        // Sort by full-precision score; ranks below handle ties.
        players.sort_by(|a, b| b.4.partial_cmp(&a.4).unwrap_or(std::cmp::Ordering::Equal));

        let scores: Vec<f64> = players.iter().map(|p| p.4).collect();
        let ranks = competition_ranks(&scores);
        let total = players.len();

        debug!(player_count = total, "Leaderboard computed");

        Ok(players
            .into_iter()
            .zip(ranks)
            .map(
                |((student_id, player_name, wins, games, s), rank)| LeaderboardEntry {
                    rank,
                    title: Tier::for_standing(rank, total).label().to_string(),
                    student_id,
                    player_name,
                    score: s.round() as i64,
                    wins,
                    games,
                },
            )
            .collect())
    }
}
