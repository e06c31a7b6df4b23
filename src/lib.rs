// Library crate for the Howl club server
// This file exposes the public API for integration tests

pub mod game;
pub mod ledger;
pub mod membership;
pub mod ranking;
pub mod roster;
pub mod schedule;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use game::{GmSession, GmSessionManager, Phase, Role, RoleConfig, Team};
pub use shared::{AppError, AppState};

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the full application router: public pages plus the admin console
/// behind the session middleware.
pub fn app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/session/logout", post(session::logout))
        .route("/players", get(roster::list_players))
        .route("/players/active", get(roster::list_active_players))
        .route(
            "/players/:student_id/deactivate",
            post(roster::deactivate_player),
        )
        .route("/results", post(ledger::record_results))
        .route("/results/latest", delete(ledger::undo_last_results))
        .route("/membership/pending", get(membership::list_pending))
        .route("/membership/:id/approve", post(membership::approve_membership))
        .route("/membership/:id/reject", post(membership::reject_membership))
        .route("/gm", get(game::handlers::get_state))
        .route("/gm/setup", post(game::handlers::setup))
        .route("/gm/execute", post(game::handlers::execute))
        .route("/gm/night", post(game::handlers::night))
        .route("/gm/commit", post(game::handlers::commit))
        .route("/gm/reset", post(game::handlers::reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::admin_auth,
        ));

    Router::new()
        .route("/session/login", post(session::login))
        .route("/leaderboard", get(ranking::get_leaderboard))
        .route("/results/history", get(ledger::list_results))
        .route("/membership", post(membership::submit_membership))
        .route("/schedule", get(schedule::get_schedule))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
