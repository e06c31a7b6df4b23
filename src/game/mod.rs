// Public API
pub use logic::{
    AlignmentReveal, GameError, GameEvent, GmSession, NightActions, Participant, Phase,
    SessionPlayer,
};
pub use manager::GmSessionManager;
pub use roles::{Role, RoleConfig, Team};
pub use service::GmService;

// Internal modules
pub mod handlers;
pub mod logic;
mod manager;
pub mod roles;
mod service;
pub mod types;
