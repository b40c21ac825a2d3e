// API Server Binary Entry Point
//
// Purpose: Start the crop advisory API server
// Usage: cargo run --bin api_server
// Environment: PORT, BIND_ADDR, MODELS_DIR, RNG_SEED, RUST_LOG

use crop_advisor_rust::{create_router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_advisor_rust=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServerConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  BIND_ADDR: {}", config.bind_addr);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  MODELS_DIR: {}", config.models_dir.display());
    match config.rng_seed {
        Some(seed) => tracing::info!("  RNG_SEED: {} (deterministic)", seed),
        None => tracing::info!("  RNG_SEED: unset"),
    }

    // Artifacts load once; a missing or broken one leaves its fallback in place
    let state = AppState::new(&config);
    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
