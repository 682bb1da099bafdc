use crate::assets;
use crate::auth as auth_service;
use crate::config;
use crate::ports::{RegistrationStore, StoreError};
use crate::state;
use crate::store::FileRegistrationStore;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use std::sync::Arc;

mod auth;
mod error;
mod notify;
mod push;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid auth configuration: {0}")]
    Auth(#[from] auth_service::AuthError),
    #[error("failed to open registration store: {0}")]
    Store(#[from] StoreError),
}

pub fn app(config: config::AppConfig) -> Result<Router, StartupError> {
    let store: Arc<dyn RegistrationStore> = match config.store_path.as_ref() {
        Some(path) => Arc::new(FileRegistrationStore::open(path)?),
        None => {
            tracing::warn!("no registration store path configured; subscriptions live in memory");
            Arc::new(FileRegistrationStore::in_memory())
        }
    };
    app_with_store(config, store)
}

pub fn app_with_store(
    config: config::AppConfig,
    store: Arc<dyn RegistrationStore>,
) -> Result<Router, StartupError> {
    let auth = auth_service::AuthState::from_config(&config)?;
    if auth.is_none() {
        tracing::warn!("no auth key configured; /api/notify will reject every request");
    }
    let state = state::AppState {
        config,
        auth,
        store,
    };

    Ok(Router::new()
        .route(
            "/api/notify",
            post(notify::notify).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_notifier,
            )),
        )
        .route(
            "/api/push/subscribe",
            get(push::push_subscription_status).post(push::push_subscribe),
        )
        .route("/api/push/unsubscribe", post(push::push_unsubscribe))
        .route("/api/push/public-key", get(push::push_public_key))
        .route("/sw.js", get(assets::service_worker))
        .route("/health", get(health))
        .with_state(state))
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
