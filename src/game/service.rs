use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::logic::{GameError, GmSession, NightActions, Participant, Phase};
use super::manager::GmSessionManager;
use super::types::{CommitRequest, CommitResponse, GmStateResponse, PlayerView, SetupRequest};
use crate::ledger::models::MatchParticipant;
use crate::ledger::repository::LedgerRepository;
use crate::ledger::service::LedgerService;
use crate::roster::repository::RosterRepository;
use crate::session::token::AdminCredential;
use crate::shared::AppError;

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Orchestrates one GM session per admin browser session: roster lookups at
/// setup, the phase transitions, and the ledger write-back at commit.
pub struct GmService {
    manager: GmSessionManager,
    roster_repository: Arc<dyn RosterRepository + Send + Sync>,
    ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
    admin: AdminCredential,
}

impl GmService {
    pub fn new(
        manager: GmSessionManager,
        roster_repository: Arc<dyn RosterRepository + Send + Sync>,
        ledger_repository: Arc<dyn LedgerRepository + Send + Sync>,
        admin: AdminCredential,
    ) -> Self {
        Self {
            manager,
            roster_repository,
            ledger_repository,
            admin,
        }
    }

    /// Starts a game from the submitted roster ids and role counts,
    /// replacing whatever session the admin had before.
    #[instrument(skip(self, request))]
    pub async fn setup(
        &self,
        session_id: &str,
        request: SetupRequest,
    ) -> Result<GmStateResponse, AppError> {
        let mut unique = HashSet::new();
        for student_id in &request.participants {
            if !unique.insert(student_id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate participant: {}",
                    student_id
                )));
            }
        }

        let roster = self.roster_repository.list_active().await?;
        let mut participants = Vec::with_capacity(request.participants.len());
        for student_id in &request.participants {
            let player = roster
                .iter()
                .find(|p| p.student_id == *student_id)
                .ok_or_else(|| {
                    warn!(student_id = %student_id, "Participant not on the active roster");
                    AppError::BadRequest(format!(
                        "{} is not on the active roster",
                        student_id
                    ))
                })?;
            participants.push(Participant {
                student_id: player.student_id.clone(),
                name: player.name.clone(),
            });
        }

        let session = GmSession::start(&participants, &request.roles)?;
        info!(
            participant_count = participants.len(),
            "Game started"
        );

        let view = Self::render(&session, None);
        self.manager.put(session_id, session).await;
        Ok(view)
    }

    /// The current phase view. Consumes the pending seer reveal, so it is
    /// shown exactly once.
    #[instrument(skip(self))]
    pub async fn view(&self, session_id: &str) -> Result<GmStateResponse, AppError> {
        let Some(mut session) = self.manager.get(session_id).await else {
            return Ok(Self::setup_view());
        };

        let divination = session.take_divination();
        if divination.is_some() {
            self.manager.put(session_id, session.clone()).await;
        }

        Ok(Self::render(&session, divination))
    }

    /// Day-phase execution of one living participant.
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        session_id: &str,
        student_id: &str,
    ) -> Result<GmStateResponse, AppError> {
        let mut session = self.require_session(session_id).await?;
        session.execute(student_id)?;
        self.manager.put(session_id, session).await;
        self.view(session_id).await
    }

    /// Night-phase resolution of the collected selections.
    #[instrument(skip(self, actions))]
    pub async fn night(
        &self,
        session_id: &str,
        actions: &NightActions,
    ) -> Result<GmStateResponse, AppError> {
        let mut session = self.require_session(session_id).await?;
        session.resolve_night(actions)?;
        self.manager.put(session_id, session).await;
        self.view(session_id).await
    }

    /// Writes the final winner/loser sets into the match ledger, gated
    /// behind a re-entered admin password, and discards the session.
    #[instrument(skip(self, request))]
    pub async fn commit(
        &self,
        session_id: &str,
        request: CommitRequest,
    ) -> Result<CommitResponse, AppError> {
        let session = self.require_session(session_id).await?;
        if session.phase() != Phase::Result {
            return Err(AppError::BadRequest(
                "The game is not finished yet".to_string(),
            ));
        }

        if !self.admin.verify(&request.password) {
            warn!("Wrong admin password on result commit");
            return Err(AppError::Unauthorized(
                "Wrong admin password".to_string(),
            ));
        }

        let winners = Self::participants_from(&session, &request.winners)?;
        let losers = Self::participants_from(&session, &request.losers)?;

        let memo = request
            .memo
            .unwrap_or_else(|| format!("{}日で決着", session.turn()));

        let ledger = LedgerService::new(
            Arc::clone(&self.ledger_repository),
            Arc::clone(&self.roster_repository),
        );
        let created_at = ledger
            .record_match(request.game_date, &memo, &winners, &losers)
            .await?;

        // The session is spent once its result is on the ledger.
        self.manager.remove(session_id).await;
        info!(
            winner_count = winners.len(),
            loser_count = losers.len(),
            "Game result committed"
        );

        Ok(CommitResponse {
            created_at,
            winner_count: winners.len(),
            loser_count: losers.len(),
        })
    }

    /// Discards all in-memory session state, returning to setup.
    #[instrument(skip(self))]
    pub async fn reset(&self, session_id: &str) -> Result<GmStateResponse, AppError> {
        let discarded = self.manager.remove(session_id).await;
        info!(discarded, "GM session reset");
        Ok(Self::setup_view())
    }

    async fn require_session(&self, session_id: &str) -> Result<GmSession, AppError> {
        self.manager
            .get(session_id)
            .await
            .ok_or_else(|| AppError::NotFound("No game in progress".to_string()))
    }

    fn participants_from(
        session: &GmSession,
        student_ids: &[String],
    ) -> Result<Vec<MatchParticipant>, AppError> {
        student_ids
            .iter()
            .map(|student_id| {
                session
                    .players()
                    .iter()
                    .find(|p| p.student_id == *student_id)
                    .map(|p| MatchParticipant {
                        student_id: p.student_id.clone(),
                        player_name: p.name.clone(),
                    })
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "{} did not take part in this game",
                            student_id
                        ))
                    })
            })
            .collect()
    }

    fn setup_view() -> GmStateResponse {
        GmStateResponse {
            phase: Phase::Setup,
            turn: 0,
            players: Vec::new(),
            log: Vec::new(),
            events: Vec::new(),
            divination: None,
            medium_report: None,
            winner: None,
            default_winners: Vec::new(),
            default_losers: Vec::new(),
        }
    }

    fn render(
        session: &GmSession,
        divination: Option<super::logic::AlignmentReveal>,
    ) -> GmStateResponse {
        let (default_winners, default_losers) = session
            .default_outcome()
            .map(|(winners, losers)| {
                (
                    winners.into_iter().map(|p| p.student_id).collect(),
                    losers.into_iter().map(|p| p.student_id).collect(),
                )
            })
            .unwrap_or_default();

        GmStateResponse {
            phase: session.phase(),
            turn: session.turn(),
            players: session
                .players()
                .iter()
                .map(|p| PlayerView {
                    student_id: p.student_id.clone(),
                    name: p.name.clone(),
                    role: p.role,
                    team: p.team(),
                    alive: p.alive,
                })
                .collect(),
            log: session.log().iter().map(|e| e.to_string()).collect(),
            events: session.log().to_vec(),
            divination,
            medium_report: session.medium_report(),
            winner: session.winner(),
            default_winners,
            default_losers,
        }
    }
}
