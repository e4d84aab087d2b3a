use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agenda_db::{init_database, RedbEventStore};
use agenda_server::{routes, AppState, Config};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: AGENDA_LISTEN_ADDR, AGENDA_DB_PATH, AGENDA_CORS_ORIGINS");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Agenda server");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Database path: {}", config.db_path.display());

    // Initialize database
    let db = match init_database(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(std::sync::Arc::new(RedbEventStore::new(db)));

    // Build router
    let app = routes::create_router(state).layer(routes::cors_layer(&config.cors_origins));

    // Start server
    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving without graceful shutdown
        std::future::pending::<()>().await;
    }
}
