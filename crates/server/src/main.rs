//! Prediction server binary.
//!
//! Reads `HOST`, `PORT` and `MODEL_PATH` (optionally from `.env`) and serves
//! the registry's model. A missing or unreadable model does not stop the
//! server; it starts degraded and `/predict` answers 503.

use anyhow::Context;
use server::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,registry=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    server::run(config).await.context("server failed")?;
    Ok(())
}
