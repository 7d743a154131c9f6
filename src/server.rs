/// Server setup and initialization
///
/// Wires together storage, page routes, static files and request tracing.
/// Provides the application factory used by `main` and by the integration tests.

use crate::{
    api::{
        create_project_routes,
        projects::{health_check, not_found},
        AppState,
    },
    config::Config,
    project::{database, ProjectStorage},
};
use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Create the main Axum application with all routes and middleware
///
/// Opens the configured database, initializes the schema and builds the router.
pub async fn create_app(config: &Config) -> Result<Router> {
    tracing::info!("🏗️ Initializing budget storage");
    let pool = database::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize database: {}", e))?;

    let app = build_router(pool, &config.static_dir);

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the router over an already initialized pool
pub fn build_router(pool: SqlitePool, static_dir: &str) -> Router {
    let app_state = AppState {
        storage: ProjectStorage::new(pool),
    };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Detail page script
        .nest_service("/static", ServeDir::new(static_dir))
        // Project pages
        .merge(create_project_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and serves it on the configured address until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("budget=info,tower_http=info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting budget server...");

    let app = create_app(&config).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
