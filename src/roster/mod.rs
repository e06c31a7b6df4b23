// Public API
pub use handlers::{deactivate_player, list_active_players, list_players};
pub use models::PlayerModel;
pub use repository::{InMemoryRosterRepository, PostgresRosterRepository, RosterRepository};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
