// Public API - what other modules can use
pub use handlers::{login, logout};
pub use middleware::admin_auth;
pub use token::{AdminCredential, TokenConfig};
pub use types::SessionClaims;

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
pub mod service;
pub mod token;
mod types;
