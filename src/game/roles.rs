use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The fixed role set a GM can deal from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Madman,
    Seer,
    Knight,
    Medium,
    Villager,
}

/// Win-condition alignment. Derived solely from the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Werewolves,
    Village,
}

impl Role {
    /// Fixed role -> team mapping. The madman sides with the werewolves
    /// even though they count as neither wolf nor villager in the parity
    /// check.
    pub fn team(self) -> Team {
        match self {
            Role::Werewolf | Role::Madman => Team::Werewolves,
            Role::Seer | Role::Knight | Role::Medium | Role::Villager => Team::Village,
        }
    }

    /// Display label as shown on the GM panel and in the session log.
    pub fn label(self) -> &'static str {
        match self {
            Role::Werewolf => "人狼",
            Role::Madman => "狂人",
            Role::Seer => "占い師",
            Role::Knight => "騎士",
            Role::Medium => "霊能者",
            Role::Villager => "市民",
        }
    }
}

impl Team {
    pub fn label(self) -> &'static str {
        match self {
            Team::Werewolves => "人狼",
            Team::Village => "市民",
        }
    }
}

/// How many of each role the GM configured at setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub werewolf: usize,
    pub madman: usize,
    pub seer: usize,
    pub knight: usize,
    pub medium: usize,
    pub villager: usize,
}

impl RoleConfig {
    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Werewolf => self.werewolf,
            Role::Madman => self.madman,
            Role::Seer => self.seer,
            Role::Knight => self.knight,
            Role::Medium => self.medium,
            Role::Villager => self.villager,
        }
    }

    pub fn total(&self) -> usize {
        Role::iter().map(|role| self.count(role)).sum()
    }

    /// The full multiset of role labels to shuffle at setup, one entry per
    /// participant seat.
    pub fn to_roles(&self) -> Vec<Role> {
        Role::iter()
            .flat_map(|role| std::iter::repeat(role).take(self.count(role)))
            .collect()
    }
}
