//! HTTP server for the REST facade
//!
//! Wires every route to its handler, applies CORS and request tracing, and
//! runs until ctrl-c or SIGTERM.

use crate::api::handlers;
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full route table
pub fn router(state: Arc<AppState>) -> Router {
    // CORS open to any origin; the API is read-mostly and unauthenticated
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ================================================================
        // Health and info
        // ================================================================
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))

        // ================================================================
        // Rates, currencies, dollar
        // ================================================================
        .route("/api/rates", get(handlers::get_rates))
        .route("/api/rates/:currency_id", get(handlers::get_rate_history))
        .route("/api/currencies", get(handlers::get_currencies))
        .route("/api/currencies/:id", get(handlers::get_currency_by_id))
        .route("/api/dollar", get(handlers::get_dollar))

        // ================================================================
        // Refresh and statistics
        // ================================================================
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/stats", get(handlers::get_stats))

        // ================================================================
        // JSONPlaceholder compatibility shim
        // ================================================================
        .route("/api/users", get(handlers::get_users))
        .route("/api/users/:id", get(handlers::get_user_by_id))
        .route("/api/users/:id/posts", get(handlers::get_user_posts))
        .route("/api/posts", get(handlers::get_posts))
        .route("/api/posts/:id", get(handlers::get_post_by_id))

        // ================================================================
        // Diagnostics
        // ================================================================
        .route("/api/test/soap", get(handlers::test_soap))
        .route("/api/test/database", get(handlers::test_database))

        .fallback(handlers::fallback)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and run the server until a shutdown signal arrives
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.bind_addr();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    // Shutdown channel, fired by the signal listener
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(());
    });

    info!("Banguat rates API listening on http://{}", addr);
    log_endpoints(&addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
        info!("API server shutting down");
    })
    .await?;

    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}

fn log_endpoints(addr: &SocketAddr) {
    info!("");
    info!("=== Endpoints ===");
    info!("");
    info!("Health Check:");
    info!("  GET  http://{}/health", addr);
    info!("  GET  http://{}/info", addr);
    info!("");
    info!("Rates and Currencies:");
    info!("  GET  http://{}/api/rates", addr);
    info!("  GET  http://{}/api/rates/{{currency_id}}", addr);
    info!("  GET  http://{}/api/currencies", addr);
    info!("  GET  http://{}/api/dollar", addr);
    info!("  POST http://{}/api/refresh", addr);
    info!("  GET  http://{}/api/stats", addr);
    info!("");
    info!("Frontend Compatibility:");
    info!("  GET  http://{}/api/users", addr);
    info!("  GET  http://{}/api/posts", addr);
}
