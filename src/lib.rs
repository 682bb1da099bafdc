pub mod adapters;
mod app;
mod assets;
pub mod auth;
pub mod config;
pub mod ports;
pub mod push;
pub mod scoreboard;
mod state;
pub mod store;
mod templates;
pub mod types;

pub use app::{StartupError, app, app_with_store};
pub use push::generate_vapid_credentials;

use std::net::SocketAddr;

pub async fn serve(addr: SocketAddr, config: config::AppConfig) -> Result<(), ServeError> {
    let router = app(config)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
