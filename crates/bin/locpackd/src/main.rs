//! # locpackd, the locpack daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`locpack.toml` plus environment overrides)
//! - Initialise `tracing` from the configured filter
//! - Initialise the `SQLite` connection pool and run migrations
//! - Construct repository implementations and inject them into the services
//! - Build the axum router, bind to a TCP port and serve
//! - Shut down gracefully on SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use locpack_adapter_http_axum::state::AppState;
use locpack_adapter_storage_sqlite_sqlx::{
    SqliteCollectionRepository, SqlitePlaceRepository, SqliteUserRepository,
};
use locpack_app::services::collection_service::CollectionService;
use locpack_app::services::place_service::PlaceService;
use locpack_app::services::user_service::UserService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = locpack_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let user_repo = SqliteUserRepository::new(pool.clone());
    let place_repo = SqlitePlaceRepository::new(pool.clone());
    let collection_repo = SqliteCollectionRepository::new(pool);

    // Services
    let user_service =
        UserService::new(user_repo.clone()).with_rename_policy(config.users.rename_policy.into());
    let place_service = PlaceService::new(place_repo.clone(), user_repo.clone());
    let collection_service = CollectionService::new(collection_repo, place_repo, user_repo);

    // HTTP
    let state = AppState::new(user_service, place_service, collection_service);
    let app = locpack_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "locpackd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("locpackd stopped");
    Ok(())
}

/// Resolve when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
