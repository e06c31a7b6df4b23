use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{MatchResultModel, NewMatchResult, TransactionModel};
use crate::shared::AppError;

/// Trait for match-ledger repository operations.
///
/// `insert_batch` must stamp every row of one call with the same
/// `created_at` and return it: that timestamp is the unit of "one
/// registered match" and the key the undo operation deletes by.
#[async_trait]
pub trait LedgerRepository {
    async fn insert_batch(&self, rows: &[NewMatchResult]) -> Result<DateTime<Utc>, AppError>;
    /// All rows, newest game first.
    async fn list_results(&self) -> Result<Vec<MatchResultModel>, AppError>;
    /// The `created_at` of the most recently inserted batch.
    async fn latest_batch(&self) -> Result<Option<DateTime<Utc>>, AppError>;
    /// Deletes every row sharing `created_at`; returns how many went.
    async fn delete_batch(&self, created_at: DateTime<Utc>) -> Result<u64, AppError>;
    async fn insert_transaction(&self, tx: &TransactionModel) -> Result<(), AppError>;
}

/// In-memory implementation of LedgerRepository for development and testing
pub struct InMemoryLedgerRepository {
    results: Mutex<Vec<MatchResultModel>>,
    transactions: Mutex<Vec<TransactionModel>>,
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
        }
    }

    /// Recorded finance entries, for assertions in tests.
    pub fn transactions(&self) -> Vec<TransactionModel> {
        self.transactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    #[instrument(skip(self, rows))]
    async fn insert_batch(&self, rows: &[NewMatchResult]) -> Result<DateTime<Utc>, AppError> {
        let mut results = self.results.lock().unwrap();

        // created_at keys the whole batch, so it must be strictly newer than
        // any row already present.
        let mut created_at = Utc::now();
        if let Some(last) = results.iter().map(|r| r.created_at).max() {
            if created_at <= last {
                created_at = last + Duration::microseconds(1);
            }
        }

        for row in rows {
            results.push(MatchResultModel {
                game_date: row.game_date,
                student_id: row.student_id.clone(),
                player_name: row.player_name.clone(),
                is_win: row.is_win,
                memo: row.memo.clone(),
                created_at,
            });
        }

        debug!(row_count = rows.len(), %created_at, "Match batch recorded");
        Ok(created_at)
    }

    #[instrument(skip(self))]
    async fn list_results(&self) -> Result<Vec<MatchResultModel>, AppError> {
        let results = self.results.lock().unwrap();
        let mut rows = results.clone();
        rows.sort_by(|a, b| {
            b.game_date
                .cmp(&a.game_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn latest_batch(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let results = self.results.lock().unwrap();
        Ok(results.iter().map(|r| r.created_at).max())
    }

    #[instrument(skip(self))]
    async fn delete_batch(&self, created_at: DateTime<Utc>) -> Result<u64, AppError> {
        let mut results = self.results.lock().unwrap();
        let before = results.len();
        results.retain(|r| r.created_at != created_at);
        let removed = (before - results.len()) as u64;
        debug!(removed, %created_at, "Match batch deleted");
        Ok(removed)
    }

    #[instrument(skip(self, tx))]
    async fn insert_transaction(&self, tx: &TransactionModel) -> Result<(), AppError> {
        let mut transactions = self.transactions.lock().unwrap();
        transactions.push(tx.clone());
        debug!(category = %tx.category, amount = tx.amount, "Transaction recorded");
        Ok(())
    }
}

/// PostgreSQL implementation of the match ledger
pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_result(row: &sqlx::postgres::PgRow) -> MatchResultModel {
        MatchResultModel {
            game_date: row.get("game_date"),
            student_id: row.get("student_id"),
            player_name: row.get("player_name"),
            is_win: row.get("is_win"),
            memo: row.get("memo"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    #[instrument(skip(self, rows))]
    async fn insert_batch(&self, rows: &[NewMatchResult]) -> Result<DateTime<Utc>, AppError> {
        // One timestamp for the whole batch; the rows are inserted
        // independently and can partially fail, matching the upstream
        // store's behavior.
        let created_at = Utc::now();

        for row in rows {
            sqlx::query(
                "INSERT INTO match_results (game_date, student_id, player_name, is_win, memo, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.game_date)
            .bind(&row.student_id)
            .bind(&row.player_name)
            .bind(row.is_win)
            .bind(&row.memo)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, student_id = %row.student_id, "Failed to insert match result");
                AppError::DatabaseError(e.to_string())
            })?;
        }

        debug!(row_count = rows.len(), %created_at, "Match batch recorded");
        Ok(created_at)
    }

    #[instrument(skip(self))]
    async fn list_results(&self) -> Result<Vec<MatchResultModel>, AppError> {
        let rows = sqlx::query(
            "SELECT game_date, student_id, player_name, is_win, memo, created_at \
             FROM match_results ORDER BY game_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list match results");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_result).collect())
    }

    #[instrument(skip(self))]
    async fn latest_batch(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let row = sqlx::query(
            "SELECT created_at FROM match_results ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch latest batch timestamp");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.get("created_at")))
    }

    #[instrument(skip(self))]
    async fn delete_batch(&self, created_at: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM match_results WHERE created_at = $1")
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete match batch");
                AppError::DatabaseError(e.to_string())
            })?;

        let removed = result.rows_affected();
        debug!(removed, %created_at, "Match batch deleted");
        Ok(removed)
    }

    #[instrument(skip(self, tx))]
    async fn insert_transaction(&self, tx: &TransactionModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO transactions (type, category, amount, description, created_by) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&tx.tx_type)
        .bind(&tx.category)
        .bind(tx.amount)
        .bind(&tx.description)
        .bind(&tx.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert transaction");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(category = %tx.category, amount = tx.amount, "Transaction recorded");
        Ok(())
    }
}
