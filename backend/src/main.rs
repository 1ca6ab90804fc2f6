use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use birthday_tracker_backend::{config::AppConfig, create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config)?;

    // Start the server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
