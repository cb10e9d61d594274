//! Banguat Rates - Guatemala exchange-rate bridge
//!
//! Fetches the daily exchange rates published by the Banco de Guatemala
//! SOAP service, stores them in SQLite, and re-exposes them as a JSON REST
//! API, including a JSONPlaceholder-compatible shim for the existing
//! frontend.

pub mod api;
pub mod banguat;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

use config::Config;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the server
pub async fn run() -> error::Result<()> {
    // .env is optional; real environment variables win over file values
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banguat_rates=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Banguat rates backend...");

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new(config)?);

    api::serve(state).await
}
