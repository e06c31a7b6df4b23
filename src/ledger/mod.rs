// Public API
pub use handlers::{list_results, record_results, undo_last_results};
pub use models::{MatchParticipant, MatchResultModel, NewMatchResult, TransactionModel};
pub use repository::{InMemoryLedgerRepository, LedgerRepository, PostgresLedgerRepository};
pub use service::LedgerService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
