mod config;
mod routes;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Router(String),
    #[error("failed to bind port {port}: {source}")]
    Bind { port: u16, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run().await.inspect_err(|e| tracing::error!(error = %e, "hospital-finder failed"))
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        lookup_api = %config.lookup_api_url,
        google_sign_in = config.google_client_id.is_some(),
        "configuration loaded"
    );

    let app = routes::app(&config).map_err(StartupError::Router)?;
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|source| StartupError::Bind { port, source })?;

    tracing::info!(%port, "hospital-finder listening");
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}
