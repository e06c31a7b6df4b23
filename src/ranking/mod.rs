// Public API
pub use handlers::get_leaderboard;
pub use score::{competition_ranks, score, Tier};
pub use service::{LeaderboardEntry, RankingService};

// Internal modules
mod handlers;
pub mod score;
pub mod service;
