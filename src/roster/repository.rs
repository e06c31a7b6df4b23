use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::PlayerModel;
use crate::shared::AppError;

/// Trait for roster repository operations
#[async_trait]
pub trait RosterRepository {
    async fn insert_player(&self, player: &PlayerModel) -> Result<(), AppError>;
    async fn get_player(&self, student_id: &str) -> Result<Option<PlayerModel>, AppError>;
    async fn list_active(&self) -> Result<Vec<PlayerModel>, AppError>;
    async fn list_all(&self) -> Result<Vec<PlayerModel>, AppError>;
    async fn deactivate(&self, student_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of RosterRepository for development and testing
pub struct InMemoryRosterRepository {
    players: Mutex<HashMap<String, PlayerModel>>,
}

impl Default for InMemoryRosterRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRosterRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory roster with pre-populated players
    pub fn with_players(players: Vec<PlayerModel>) -> Self {
        let mut map = HashMap::new();
        for player in players {
            map.insert(player.student_id.clone(), player);
        }
        Self {
            players: Mutex::new(map),
        }
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    #[instrument(skip(self, player))]
    async fn insert_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        if players.contains_key(&player.student_id) {
            warn!(student_id = %player.student_id, "Player already on the roster");
            return Err(AppError::DatabaseError(
                "Player already exists".to_string(),
            ));
        }
        players.insert(player.student_id.clone(), player.clone());
        debug!(student_id = %player.student_id, "Player added to roster");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, student_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.get(student_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        let mut active: Vec<PlayerModel> =
            players.values().filter(|p| p.is_active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<PlayerModel>, AppError> {
        let players = self.players.lock().unwrap();
        let mut all: Vec<PlayerModel> = players.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, student_id: &str) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        match players.get_mut(student_id) {
            Some(player) => {
                player.is_active = false;
                debug!(student_id = %student_id, "Player deactivated");
                Ok(())
            }
            None => {
                warn!(student_id = %student_id, "Player not found for deactivation");
                Err(AppError::NotFound("Player not found".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of roster repository
pub struct PostgresRosterRepository {
    pool: PgPool,
}

impl PostgresRosterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_player(row: &sqlx::postgres::PgRow) -> PlayerModel {
        PlayerModel {
            student_id: row.get("student_id"),
            name: row.get("name"),
            is_active: row.get("is_active"),
        }
    }
}

#[async_trait]
impl RosterRepository for PostgresRosterRepository {
    #[instrument(skip(self, player))]
    async fn insert_player(&self, player: &PlayerModel) -> Result<(), AppError> {
        sqlx::query("INSERT INTO players (student_id, name, is_active) VALUES ($1, $2, $3)")
            .bind(&player.student_id)
            .bind(&player.name)
            .bind(player.is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to insert player");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(student_id = %player.student_id, "Player added to roster");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, student_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let row = sqlx::query("SELECT student_id, name, is_active FROM players WHERE student_id = $1")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch player");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.as_ref().map(Self::row_to_player))
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<PlayerModel>, AppError> {
        let rows = sqlx::query(
            "SELECT student_id, name, is_active FROM players WHERE is_active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list active players");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<PlayerModel>, AppError> {
        let rows = sqlx::query("SELECT student_id, name, is_active FROM players ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list players");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, student_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE players SET is_active = FALSE WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to deactivate player");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(student_id = %student_id, "Player not found for deactivation");
            return Err(AppError::NotFound("Player not found".to_string()));
        }

        debug!(student_id = %student_id, "Player deactivated");
        Ok(())
    }
}
