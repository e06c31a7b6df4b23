// In-memory state machine for one GM-assisted game. The session is owned by
// one admin browser session and is never persisted; reset discards it whole.
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::roles::{Role, RoleConfig, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Day,
    Night,
    Result,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GameError {
    #[error("Role counts ({roles}) do not match the participant count ({participants})")]
    RoleCountMismatch { roles: usize, participants: usize },
    #[error("No participants selected")]
    NoParticipants,
    #[error("Action not available in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("{0} is not among the living")]
    NotLiving(String),
    #[error("The werewolves cannot attack one of their own")]
    AttackOnWerewolf,
    #[error("No living seer to divine")]
    NoSeer,
    #[error("The seer cannot divine themselves")]
    SeerSelfTarget,
    #[error("No living knight to protect")]
    NoKnight,
    #[error("The knight cannot protect themselves")]
    KnightSelfTarget,
}

/// One seat at the table. The team is derived from the role, never stored
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlayer {
    pub student_id: String,
    pub name: String,
    pub role: Role,
    pub alive: bool,
}

impl SessionPlayer {
    pub fn team(&self) -> Team {
        self.role.team()
    }
}

/// Structured session log entry. Carries typed fields so later phases can
/// recover "who was executed last" without parsing narrative text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted,
    Executed {
        turn: u32,
        student_id: String,
        name: String,
    },
    Attacked {
        turn: u32,
        student_id: String,
        name: String,
    },
    AttackBlocked {
        turn: u32,
    },
    NoAttack {
        turn: u32,
    },
    GameOver {
        winner: Team,
    },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStarted => write!(f, "--- ゲーム開始 ---"),
            GameEvent::Executed { turn, name, .. } => {
                write!(f, "Day {}: {} が処刑されました。", turn, name)
            }
            GameEvent::Attacked { turn, name, .. } => {
                write!(f, "Night {}: {} が襲撃されました。", turn, name)
            }
            GameEvent::AttackBlocked { turn } => {
                write!(f, "Night {}: 襲撃は護衛された。", turn)
            }
            GameEvent::NoAttack { turn } => {
                write!(f, "Night {}: 誰も襲撃されませんでした。", turn)
            }
            GameEvent::GameOver { winner } => {
                write!(f, "--- {}チームの勝利 ---", winner.label())
            }
        }
    }
}

/// A werewolf / not-a-werewolf reveal about one participant. Used both for
/// the seer's night divination and the medium's morning report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReveal {
    pub student_id: String,
    pub name: String,
    pub is_werewolf: bool,
}

/// The up-to-three independent night selections, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NightActions {
    pub attack_target: Option<String>,
    pub divination_target: Option<String>,
    pub protection_target: Option<String>,
}

/// A participant picked from the roster at setup time.
#[derive(Debug, Clone)]
pub struct Participant {
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmSession {
    players: Vec<SessionPlayer>,
    phase: Phase,
    turn: u32,
    log: Vec<GameEvent>,
    /// Seer result from the latest night, surfaced once on the next day
    /// view and then cleared.
    pending_divination: Option<AlignmentReveal>,
    winner: Option<Team>,
}

enum AttackOutcome {
    Killed(usize),
    Blocked,
    NoTarget,
}

impl GmSession {
    /// Constructor used by tests and the setup transition. `start` is the
    /// public entry point that deals roles.
    pub fn new(players: Vec<SessionPlayer>, phase: Phase, turn: u32) -> Self {
        Self {
            players,
            phase,
            turn,
            log: vec![GameEvent::GameStarted],
            pending_divination: None,
            winner: None,
        }
    }

    /// Setup -> Day. Shuffles the configured role multiset and assigns one
    /// role per participant by position. Rejects without mutating anything
    /// when the counts do not line up.
    pub fn start(participants: &[Participant], config: &RoleConfig) -> Result<Self, GameError> {
        if config.total() != participants.len() {
            return Err(GameError::RoleCountMismatch {
                roles: config.total(),
                participants: participants.len(),
            });
        }
        if participants.is_empty() {
            return Err(GameError::NoParticipants);
        }

        let mut roles = config.to_roles();
        roles.shuffle(&mut rand::rng());

        let players = participants
            .iter()
            .zip(roles)
            .map(|(participant, role)| SessionPlayer {
                student_id: participant.student_id.clone(),
                name: participant.name.clone(),
                role,
                alive: true,
            })
            .collect();

        Ok(Self::new(players, Phase::Day, 1))
    }

    pub fn players(&self) -> &[SessionPlayer] {
        &self.players
    }

    pub fn living(&self) -> impl Iterator<Item = &SessionPlayer> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn log(&self) -> &[GameEvent] {
        &self.log
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Day: execute exactly one living participant, then either finish the
    /// game or hand over to the night of the same cycle.
    pub fn execute(&mut self, student_id: &str) -> Result<(), GameError> {
        if self.phase != Phase::Day {
            return Err(GameError::WrongPhase(self.phase));
        }

        let index = self.living_index(student_id)?;
        self.players[index].alive = false;
        self.log.push(GameEvent::Executed {
            turn: self.turn,
            student_id: self.players[index].student_id.clone(),
            name: self.players[index].name.clone(),
        });

        self.conclude_or(Phase::Night);
        Ok(())
    }

    /// Night: resolve divination, protection and the attack in one step,
    /// then either finish the game or start the next day.
    ///
    /// All selections are validated before any state changes, so a rejected
    /// submission leaves the session untouched.
    pub fn resolve_night(&mut self, actions: &NightActions) -> Result<(), GameError> {
        if self.phase != Phase::Night {
            return Err(GameError::WrongPhase(self.phase));
        }

        let divination = self.validate_divination(actions.divination_target.as_deref())?;
        let protection = self.validate_protection(actions.protection_target.as_deref())?;
        let attack = self.validate_attack(actions.attack_target.as_deref(), protection)?;

        self.pending_divination = divination;

        match attack {
            AttackOutcome::Killed(index) => {
                self.players[index].alive = false;
                self.log.push(GameEvent::Attacked {
                    turn: self.turn,
                    student_id: self.players[index].student_id.clone(),
                    name: self.players[index].name.clone(),
                });
            }
            AttackOutcome::Blocked => {
                self.log.push(GameEvent::AttackBlocked { turn: self.turn });
            }
            AttackOutcome::NoTarget => {
                self.log.push(GameEvent::NoAttack { turn: self.turn });
            }
        }

        self.conclude_or(Phase::Day);
        Ok(())
    }

    /// Takes the seer result from the latest night, clearing it. The day
    /// view shows it exactly once.
    pub fn take_divination(&mut self) -> Option<AlignmentReveal> {
        self.pending_divination.take()
    }

    /// The medium's morning report: alignment of the most recently executed
    /// participant. Available on day views from the second day on, while a
    /// medium is alive.
    pub fn medium_report(&self) -> Option<AlignmentReveal> {
        if self.phase != Phase::Day || self.turn <= 1 {
            return None;
        }
        if !self.players.iter().any(|p| p.alive && p.role == Role::Medium) {
            return None;
        }

        self.log.iter().rev().find_map(|event| match event {
            GameEvent::Executed { student_id, .. } => {
                let executed = self.players.iter().find(|p| p.student_id == *student_id)?;
                Some(AlignmentReveal {
                    student_id: executed.student_id.clone(),
                    name: executed.name.clone(),
                    is_werewolf: executed.role == Role::Werewolf,
                })
            }
            _ => None,
        })
    }

    /// Default winner/loser split for the result form: each participant's
    /// team against the side that won. None until the game is decided.
    pub fn default_outcome(&self) -> Option<(Vec<SessionPlayer>, Vec<SessionPlayer>)> {
        let winner = self.winner?;
        Some(
            self.players
                .iter()
                .cloned()
                .partition(|player| player.team() == winner),
        )
    }

    fn living_index(&self, student_id: &str) -> Result<usize, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.student_id == student_id)
            .ok_or_else(|| GameError::UnknownParticipant(student_id.to_string()))?;
        if !self.players[index].alive {
            return Err(GameError::NotLiving(self.players[index].name.clone()));
        }
        Ok(index)
    }

    fn validate_divination(
        &self,
        target: Option<&str>,
    ) -> Result<Option<AlignmentReveal>, GameError> {
        let Some(target_id) = target else {
            return Ok(None);
        };
        let seer = self
            .living()
            .find(|p| p.role == Role::Seer)
            .ok_or(GameError::NoSeer)?;
        if seer.student_id == target_id {
            return Err(GameError::SeerSelfTarget);
        }
        let index = self.living_index(target_id)?;
        let target = &self.players[index];
        Ok(Some(AlignmentReveal {
            student_id: target.student_id.clone(),
            name: target.name.clone(),
            is_werewolf: target.role == Role::Werewolf,
        }))
    }

    fn validate_protection<'a>(
        &self,
        target: Option<&'a str>,
    ) -> Result<Option<&'a str>, GameError> {
        let Some(target_id) = target else {
            return Ok(None);
        };
        let knight = self
            .living()
            .find(|p| p.role == Role::Knight)
            .ok_or(GameError::NoKnight)?;
        if knight.student_id == target_id {
            return Err(GameError::KnightSelfTarget);
        }
        self.living_index(target_id)?;
        Ok(Some(target_id))
    }

    fn validate_attack(
        &self,
        target: Option<&str>,
        protection: Option<&str>,
    ) -> Result<AttackOutcome, GameError> {
        let Some(target_id) = target else {
            return Ok(AttackOutcome::NoTarget);
        };
        let index = self.living_index(target_id)?;
        if self.players[index].role == Role::Werewolf {
            return Err(GameError::AttackOnWerewolf);
        }
        // Protection on the same target fully negates the attack.
        if protection == Some(target_id) {
            return Ok(AttackOutcome::Blocked);
        }
        Ok(AttackOutcome::Killed(index))
    }

    /// Win check, run after every death. Only the werewolf role counts on
    /// the wolf side; the madman counts for neither tally.
    fn check_winner(&self) -> Option<Team> {
        let wolves = self.living().filter(|p| p.role == Role::Werewolf).count();
        let villagers = self.living().filter(|p| p.team() == Team::Village).count();

        if wolves == 0 {
            Some(Team::Village)
        } else if wolves >= villagers {
            Some(Team::Werewolves)
        } else {
            None
        }
    }

    fn conclude_or(&mut self, next: Phase) {
        if let Some(winner) = self.check_winner() {
            self.winner = Some(winner);
            self.phase = Phase::Result;
            self.log.push(GameEvent::GameOver { winner });
        } else {
            if next == Phase::Day {
                self.turn += 1;
            }
            self.phase = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn participant(id: &str) -> Participant {
        Participant {
            student_id: id.to_string(),
            name: format!("P-{}", id),
        }
    }

    fn player(id: &str, role: Role) -> SessionPlayer {
        SessionPlayer {
            student_id: id.to_string(),
            name: format!("P-{}", id),
            role,
            alive: true,
        }
    }

    fn day_session(players: Vec<SessionPlayer>) -> GmSession {
        GmSession::new(players, Phase::Day, 1)
    }

    fn night_session(players: Vec<SessionPlayer>) -> GmSession {
        GmSession::new(players, Phase::Night, 1)
    }

    #[test]
    fn start_rejects_role_count_mismatch() {
        let participants: Vec<Participant> = (1..=5).map(|i| participant(&i.to_string())).collect();
        let config = RoleConfig {
            werewolf: 1,
            seer: 1,
            knight: 1,
            villager: 1,
            ..RoleConfig::default()
        };

        let result = GmSession::start(&participants, &config);
        assert!(matches!(
            result.unwrap_err(),
            GameError::RoleCountMismatch {
                roles: 4,
                participants: 5
            }
        ));
    }

    #[test]
    fn start_rejects_empty_participants() {
        let result = GmSession::start(&[], &RoleConfig::default());
        assert!(matches!(result.unwrap_err(), GameError::NoParticipants));
    }

    #[test]
    fn start_deals_the_configured_multiset() {
        let participants: Vec<Participant> = (1..=5).map(|i| participant(&i.to_string())).collect();
        let config = RoleConfig {
            werewolf: 1,
            madman: 1,
            seer: 1,
            villager: 2,
            ..RoleConfig::default()
        };

        let session = GmSession::start(&participants, &config).unwrap();

        assert_eq!(session.phase(), Phase::Day);
        assert_eq!(session.turn(), 1);
        assert_eq!(session.players().len(), 5);
        assert_eq!(session.log(), &[GameEvent::GameStarted]);
        assert!(session.players().iter().all(|p| p.alive));

        for role in Role::iter() {
            assert_eq!(
                session.players().iter().filter(|p| p.role == role).count(),
                config.count(role),
                "dealt count mismatch for {:?}",
                role
            );
        }
        // Team is derived solely from the role.
        for p in session.players() {
            assert_eq!(p.team(), p.role.team());
        }
    }

    #[test]
    fn execution_moves_to_night_while_undecided() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);

        session.execute("a").unwrap();

        assert_eq!(session.phase(), Phase::Night);
        assert_eq!(session.turn(), 1); // night belongs to the same cycle
        assert!(!session.players()[1].alive);
        assert_eq!(
            session.log().last().unwrap(),
            &GameEvent::Executed {
                turn: 1,
                student_id: "a".to_string(),
                name: "P-a".to_string(),
            }
        );
    }

    #[test]
    fn executing_the_last_wolf_ends_with_village_win() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        session.execute("w").unwrap();

        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.winner(), Some(Team::Village));
        assert_eq!(
            session.log().last().unwrap(),
            &GameEvent::GameOver {
                winner: Team::Village
            }
        );
    }

    #[test]
    fn wolf_parity_ends_with_werewolf_win() {
        // 1 living werewolf vs 1 living villager after the execution.
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        session.execute("a").unwrap();

        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.winner(), Some(Team::Werewolves));
    }

    #[test]
    fn madman_counts_for_neither_side() {
        // Living after the execution: 1 wolf, 1 madman, 2 villagers.
        // wolves(1) < villagers(2), so the game continues even though the
        // wolf side has two bodies.
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("m", Role::Madman),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);

        session.execute("c").unwrap();

        assert_eq!(session.phase(), Phase::Night);
        assert_eq!(session.winner(), None);
    }

    #[test]
    fn execute_rejects_dead_and_unknown_targets() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);
        session.execute("a").unwrap();

        // Back to a day phase for the assertions below.
        session.resolve_night(&NightActions::default()).unwrap();

        assert!(matches!(
            session.execute("a").unwrap_err(),
            GameError::NotLiving(_)
        ));
        assert!(matches!(
            session.execute("ghost").unwrap_err(),
            GameError::UnknownParticipant(_)
        ));
    }

    #[test]
    fn protected_attack_is_blocked() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("k", Role::Knight),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        session
            .resolve_night(&NightActions {
                attack_target: Some("a".to_string()),
                protection_target: Some("a".to_string()),
                divination_target: None,
            })
            .unwrap();

        let attacked = session
            .players()
            .iter()
            .find(|p| p.student_id == "a")
            .unwrap();
        assert!(attacked.alive);
        assert!(session
            .log()
            .iter()
            .any(|e| matches!(e, GameEvent::AttackBlocked { turn: 1 })));
        assert_eq!(session.phase(), Phase::Day);
        assert_eq!(session.turn(), 2);
    }

    #[test]
    fn unprotected_attack_kills() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("k", Role::Knight),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);

        session
            .resolve_night(&NightActions {
                attack_target: Some("a".to_string()),
                protection_target: Some("b".to_string()),
                divination_target: None,
            })
            .unwrap();

        let attacked = session
            .players()
            .iter()
            .find(|p| p.student_id == "a")
            .unwrap();
        assert!(!attacked.alive);
        assert!(session
            .log()
            .iter()
            .any(|e| matches!(e, GameEvent::Attacked { .. })));
    }

    #[test]
    fn night_without_attack_logs_no_death() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        session.resolve_night(&NightActions::default()).unwrap();

        assert!(session
            .log()
            .iter()
            .any(|e| matches!(e, GameEvent::NoAttack { turn: 1 })));
        assert_eq!(session.phase(), Phase::Day);
        assert_eq!(session.turn(), 2);
    }

    #[test]
    fn attack_cannot_target_a_werewolf() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("v", Role::Villager),
            player("u", Role::Villager),
        ]);

        let result = session.resolve_night(&NightActions {
            attack_target: Some("w".to_string()),
            ..NightActions::default()
        });

        assert!(matches!(result.unwrap_err(), GameError::AttackOnWerewolf));
        // Rejection leaves the session untouched.
        assert_eq!(session.phase(), Phase::Night);
        assert!(session.players().iter().all(|p| p.alive));
    }

    #[test]
    fn divination_reveals_alignment_once() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("s", Role::Seer),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        session
            .resolve_night(&NightActions {
                divination_target: Some("w".to_string()),
                ..NightActions::default()
            })
            .unwrap();

        let reveal = session.take_divination().unwrap();
        assert_eq!(reveal.student_id, "w");
        assert!(reveal.is_werewolf);
        // Shown once, then cleared.
        assert!(session.take_divination().is_none());
    }

    #[test]
    fn divination_requires_a_living_seer() {
        let mut seerless = night_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        let result = seerless.resolve_night(&NightActions {
            divination_target: Some("a".to_string()),
            ..NightActions::default()
        });

        assert!(matches!(result.unwrap_err(), GameError::NoSeer));
        assert_eq!(seerless.phase(), Phase::Night);
    }

    #[test]
    fn seer_cannot_divine_themselves() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("s", Role::Seer),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        let result = session.resolve_night(&NightActions {
            divination_target: Some("s".to_string()),
            ..NightActions::default()
        });

        assert!(matches!(result.unwrap_err(), GameError::SeerSelfTarget));
    }

    #[test]
    fn knight_cannot_protect_themselves() {
        let mut session = night_session(vec![
            player("w", Role::Werewolf),
            player("k", Role::Knight),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);

        let result = session.resolve_night(&NightActions {
            protection_target: Some("k".to_string()),
            ..NightActions::default()
        });

        assert!(matches!(result.unwrap_err(), GameError::KnightSelfTarget));
    }

    #[test]
    fn medium_reports_the_last_execution() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("m", Role::Medium),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);

        // Day 1: no report yet.
        assert!(session.medium_report().is_none());

        session.execute("a").unwrap();
        session.resolve_night(&NightActions::default()).unwrap();

        // Day 2: the medium sees the alignment of yesterday's execution.
        let report = session.medium_report().unwrap();
        assert_eq!(report.student_id, "a");
        assert!(!report.is_werewolf);
    }

    #[test]
    fn medium_report_needs_a_living_medium() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
            player("c", Role::Villager),
        ]);

        session.execute("a").unwrap();
        session.resolve_night(&NightActions::default()).unwrap();

        assert!(session.medium_report().is_none());
    }

    #[test]
    fn default_outcome_splits_by_team() {
        let mut session = day_session(vec![
            player("w", Role::Werewolf),
            player("m", Role::Madman),
            player("a", Role::Villager),
        ]);

        // Executing the villager leaves wolves(1) >= villagers(0).
        session.execute("a").unwrap();
        assert_eq!(session.winner(), Some(Team::Werewolves));

        let (winners, losers) = session.default_outcome().unwrap();
        let winner_ids: Vec<&str> = winners.iter().map(|p| p.student_id.as_str()).collect();
        let loser_ids: Vec<&str> = losers.iter().map(|p| p.student_id.as_str()).collect();
        assert_eq!(winner_ids, vec!["w", "m"]); // madman wins with the wolves
        assert_eq!(loser_ids, vec!["a"]);
    }

    #[test]
    fn actions_in_the_wrong_phase_are_rejected() {
        let mut night = night_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);
        assert!(matches!(
            night.execute("a").unwrap_err(),
            GameError::WrongPhase(Phase::Night)
        ));

        let mut day = day_session(vec![
            player("w", Role::Werewolf),
            player("a", Role::Villager),
            player("b", Role::Villager),
        ]);
        assert!(matches!(
            day.resolve_night(&NightActions::default()).unwrap_err(),
            GameError::WrongPhase(Phase::Day)
        ));
    }
}
