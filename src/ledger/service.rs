use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::{MatchParticipant, MatchResultModel, NewMatchResult};
use super::repository::LedgerRepository;
use crate::roster::repository::RosterRepository;
use crate::shared::AppError;

/// Service for recording and undoing match results.
pub struct LedgerService {
    ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
    roster_repository: Arc<dyn RosterRepository + Send + Sync>,
}

impl LedgerService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
        roster_repository: Arc<dyn RosterRepository + Send + Sync>,
    ) -> Self {
        Self {
            ledger_repository,
            roster_repository,
        }
    }

    /// Records one match: a win row per winner and a loss row per loser, all
    /// sharing one creation timestamp.
    ///
    /// Rejects an empty participant set and any player listed on both sides;
    /// nothing is written on rejection.
    #[instrument(skip(self, winners, losers))]
    pub async fn record_match(
        &self,
        game_date: NaiveDate,
        memo: &str,
        winners: &[MatchParticipant],
        losers: &[MatchParticipant],
    ) -> Result<DateTime<Utc>, AppError> {
        if winners.is_empty() && losers.is_empty() {
            return Err(AppError::BadRequest(
                "No participants selected".to_string(),
            ));
        }

        let winner_ids: HashSet<&str> = winners.iter().map(|p| p.student_id.as_str()).collect();
        if losers.iter().any(|p| winner_ids.contains(p.student_id.as_str())) {
            return Err(AppError::BadRequest(
                "The same player appears in both the winner and loser sets".to_string(),
            ));
        }

        let rows: Vec<NewMatchResult> = winners
            .iter()
            .map(|p| (p, 1))
            .chain(losers.iter().map(|p| (p, 0)))
            .map(|(p, is_win)| NewMatchResult {
                game_date,
                student_id: p.student_id.clone(),
                player_name: p.player_name.clone(),
                is_win,
                memo: memo.to_string(),
            })
            .collect();

        let created_at = self.ledger_repository.insert_batch(&rows).await?;

        info!(
            winner_count = winners.len(),
            loser_count = losers.len(),
            %created_at,
            "Match recorded"
        );
        Ok(created_at)
    }

    /// Resolves roster ids to participants and records the match. Used by
    /// the standalone recording form, where only ids are submitted.
    #[instrument(skip(self, winner_ids, loser_ids))]
    pub async fn record_match_by_ids(
        &self,
        game_date: NaiveDate,
        memo: &str,
        winner_ids: &[String],
        loser_ids: &[String],
    ) -> Result<DateTime<Utc>, AppError> {
        let winners = self.resolve_participants(winner_ids).await?;
        let losers = self.resolve_participants(loser_ids).await?;
        self.record_match(game_date, memo, &winners, &losers).await
    }

    /// Undoes the most recent recording event: deletes every row sharing
    /// the newest creation timestamp, leaving earlier batches intact.
    #[instrument(skip(self))]
    pub async fn undo_last_batch(&self) -> Result<DateTime<Utc>, AppError> {
        let Some(created_at) = self.ledger_repository.latest_batch().await? else {
            return Err(AppError::NotFound(
                "No match records to delete".to_string(),
            ));
        };

        let removed = self.ledger_repository.delete_batch(created_at).await?;
        info!(removed, %created_at, "Last match batch undone");
        Ok(created_at)
    }

    /// Full match history, newest game first.
    pub async fn history(&self) -> Result<Vec<MatchResultModel>, AppError> {
        self.ledger_repository.list_results().await
    }

    async fn resolve_participants(
        &self,
        student_ids: &[String],
    ) -> Result<Vec<MatchParticipant>, AppError> {
        let mut participants = Vec::with_capacity(student_ids.len());
        for student_id in student_ids {
            let player = self
                .roster_repository
                .get_player(student_id)
                .await?
                .ok_or_else(|| {
                    warn!(student_id = %student_id, "Unknown player in match record");
                    AppError::BadRequest(format!("Unknown player: {}", student_id))
                })?;
            participants.push(MatchParticipant {
                student_id: player.student_id,
                player_name: player.name,
            });
        }
        Ok(participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::repository::InMemoryLedgerRepository;
    use crate::roster::models::PlayerModel;
    use crate::roster::repository::InMemoryRosterRepository;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn participant(id: &str) -> MatchParticipant {
        MatchParticipant {
            student_id: id.to_string(),
            player_name: format!("P-{}", id),
        }
    }

    fn service() -> (Arc<InMemoryLedgerRepository>, LedgerService) {
        let ledger = Arc::new(InMemoryLedgerRepository::new());
        let roster = Arc::new(InMemoryRosterRepository::with_players(vec![
            PlayerModel::new("1".to_string(), "Alice".to_string()),
            PlayerModel::new("2".to_string(), "Bob".to_string()),
        ]));
        (
            Arc::clone(&ledger),
            LedgerService::new(ledger, roster),
        )
    }

    #[tokio::test]
    async fn records_win_and_loss_rows() {
        let (ledger, service) = service();
        let created_at = service
            .record_match(date(), "練習会", &[participant("1")], &[participant("2")])
            .await
            .unwrap();

        let rows = ledger.list_results().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.created_at == created_at));
        assert_eq!(rows.iter().filter(|r| r.won()).count(), 1);
        assert!(rows.iter().all(|r| r.memo == "練習会"));
    }

    #[tokio::test]
    async fn rejects_empty_participants() {
        let (ledger, service) = service();
        let result = service.record_match(date(), "", &[], &[]).await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
        assert!(ledger.list_results().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_winner_loser_overlap() {
        let (ledger, service) = service();
        let result = service
            .record_match(
                date(),
                "",
                &[participant("1"), participant("2")],
                &[participant("1")],
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
        assert!(ledger.list_results().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolves_names_from_the_roster() {
        let (ledger, service) = service();
        service
            .record_match_by_ids(date(), "", &["1".to_string()], &["2".to_string()])
            .await
            .unwrap();

        let rows = ledger.list_results().await.unwrap();
        let winner = rows.iter().find(|r| r.won()).unwrap();
        assert_eq!(winner.player_name, "Alice");
    }

    #[tokio::test]
    async fn unknown_id_rejects_the_whole_record() {
        let (ledger, service) = service();
        let result = service
            .record_match_by_ids(date(), "", &["ghost".to_string()], &[])
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
        assert!(ledger.list_results().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undo_removes_only_the_newest_batch() {
        let (ledger, service) = service();
        service
            .record_match(date(), "first", &[participant("1")], &[participant("2")])
            .await
            .unwrap();
        service
            .record_match(date(), "second", &[participant("2")], &[participant("1")])
            .await
            .unwrap();

        service.undo_last_batch().await.unwrap();

        let rows = ledger.list_results().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.memo == "first"));
    }

    #[tokio::test]
    async fn undo_on_empty_ledger_is_not_found() {
        let (_, service) = service();
        let result = service.undo_last_batch().await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }
}
