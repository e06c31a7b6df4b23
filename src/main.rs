use std::sync::Arc;

use howl::ledger::repository::InMemoryLedgerRepository;
use howl::membership::repository::InMemoryMembershipRepository;
use howl::roster::repository::InMemoryRosterRepository;
use howl::session::repository::InMemorySessionRepository;
use howl::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "howl=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Howl club server");

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let roster_repository = Arc::new(InMemoryRosterRepository::new());
    let ledger_repository = Arc::new(InMemoryLedgerRepository::new());
    let membership_repository = Arc::new(InMemoryMembershipRepository::new());
    let session_repository = Arc::new(InMemorySessionRepository::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let roster_repository = Arc::new(howl::roster::repository::PostgresRosterRepository::new(pool.clone()));
    // let ledger_repository = Arc::new(howl::ledger::repository::PostgresLedgerRepository::new(pool.clone()));
    // let membership_repository = Arc::new(howl::membership::repository::PostgresMembershipRepository::new(pool));

    let app_state = AppState::new(
        roster_repository,
        ledger_repository,
        membership_repository,
        session_repository,
    );

    let app = howl::app(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
