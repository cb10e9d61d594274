//! REST endpoint handlers
//!
//! All handlers answer with the shared envelope from `types`. The surface
//! has two families: the rate/currency routes backed by the store, and the
//! JSONPlaceholder-compatible shim derived from the same rows. Routes that
//! read an empty store fall back to fixed placeholder data instead of
//! failing, so a fresh deployment renders something before the first fetch.

use crate::api::compat::{self, PostRecord, UserRecord};
use crate::api::types::{now_rfc3339, ApiResponse, Empty, HistoryQuery};
use crate::banguat::dates;
use crate::db::sqlite::models::{DollarSnapshot, RateRow};
use crate::error::{AppError, Result};
use crate::services::RefreshService;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::error;

/// Shown whenever placeholder data stands in for real rows
const SIMULATED_DATA_MESSAGE: &str = "Datos simulados (sin datos reales en BD)";

// ============================================================================
// Helpers
// ============================================================================

/// Envelope + HTTP status for a failed request
fn error_response(e: &AppError) -> Response {
    (
        e.status_code(),
        Json(ApiResponse::<Empty>::failure(e.code(), &e.to_string())),
    )
        .into_response()
}

fn parse_currency_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation("ID de moneda inválido".to_string()))
}

/// Placeholder rows served while the store is still empty
fn simulated_rates() -> Vec<RateRow> {
    let today = dates::today();
    let now = now_rfc3339();
    let row = |code: i64, description: &str, symbol: &str, reference: f64| RateRow {
        currency_code: code,
        description: description.to_string(),
        symbol: Some(symbol.to_string()),
        date: today.clone(),
        buy: None,
        sell: None,
        reference: Some(reference),
        fetched_at: now.clone(),
    };

    vec![
        row(2, "Dólar Estadounidense", "$", 7.75),
        row(3, "Euro", "€", 8.45),
        row(4, "Libra Esterlina", "£", 9.85),
    ]
}

// ============================================================================
// Rates
// ============================================================================

/// GET /api/rates
pub async fn get_rates(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_current_rates() {
        Ok(rates) if rates.is_empty() => Json(
            ApiResponse::success_with_data(simulated_rates())
                .with_source("simulated")
                .with_message(SIMULATED_DATA_MESSAGE),
        )
        .into_response(),
        Ok(rates) => {
            Json(ApiResponse::success_with_data(rates).with_source("database")).into_response()
        }
        Err(e) => {
            error!("Failed to read current rates: {}", e);
            error_response(&e)
        }
    }
}

/// GET /api/rates/{currency_id}?from=&to=
pub async fn get_rate_history(
    State(state): State<Arc<AppState>>,
    Path(currency_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let code = match parse_currency_id(&currency_id) {
        Ok(code) => code,
        Err(e) => return error_response(&e),
    };

    match state
        .db
        .get_rate_history(code, query.from.as_deref(), query.to.as_deref())
    {
        Ok(rows) => {
            let count = rows.len();
            Json(ApiResponse::success_with_data(rows).with_count(count)).into_response()
        }
        Err(e) => {
            error!("Failed to read history for currency {}: {}", code, e);
            error_response(&e)
        }
    }
}

// ============================================================================
// Currencies
// ============================================================================

/// GET /api/currencies
pub async fn get_currencies(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_currencies() {
        Ok(currencies) => {
            let count = currencies.len();
            Json(ApiResponse::success_with_data(currencies).with_count(count)).into_response()
        }
        Err(e) => {
            error!("Failed to read currency catalog: {}", e);
            error_response(&e)
        }
    }
}

/// GET /api/currencies/{id}
pub async fn get_currency_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let code = match parse_currency_id(&id) {
        Ok(code) => code,
        Err(e) => return error_response(&e),
    };

    match state.db.get_currency(code) {
        Ok(Some(currency)) => Json(ApiResponse::success_with_data(currency)).into_response(),
        Ok(None) => error_response(&AppError::NotFound("Moneda no encontrada".to_string())),
        Err(e) => {
            error!("Failed to read currency {}: {}", code, e);
            error_response(&e)
        }
    }
}

// ============================================================================
// Dollar
// ============================================================================

/// GET /api/dollar
pub async fn get_dollar(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_current_dollar() {
        Ok(Some(snapshot)) => {
            Json(ApiResponse::success_with_data(vec![snapshot])).into_response()
        }
        Ok(None) => {
            let simulated = DollarSnapshot {
                date: dates::today(),
                reference: 7.75,
                fetched_at: now_rfc3339(),
            };
            Json(
                ApiResponse::success_with_data(vec![simulated])
                    .with_message(SIMULATED_DATA_MESSAGE),
            )
            .into_response()
        }
        Err(e) => {
            error!("Failed to read dollar snapshot: {}", e);
            error_response(&e)
        }
    }
}

// ============================================================================
// Refresh and statistics
// ============================================================================

/// POST /api/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let requester_ip = addr.ip().to_string();

    match RefreshService::run(&state, Some(&requester_ip)).await {
        Ok(summary) => Json(
            ApiResponse::success_with_data(summary)
                .with_message("Datos actualizados correctamente desde la API SOAP"),
        )
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_stats() {
        Ok(stats) => Json(ApiResponse::success_with_data(stats)).into_response(),
        Err(e) => {
            error!("Failed to compute statistics: {}", e);
            error_response(&e)
        }
    }
}

// ============================================================================
// JSONPlaceholder compatibility shim
// ============================================================================

/// GET /api/users
pub async fn get_users(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_currencies() {
        Ok(currencies) => {
            let users: Vec<UserRecord> =
                currencies.iter().map(compat::user_from_currency).collect();
            let count = users.len();
            Json(ApiResponse::success_with_data(users).with_count(count)).into_response()
        }
        Err(e) => {
            error!("Failed to read currencies for user shim: {}", e);
            error_response(&e)
        }
    }
}

/// GET /api/users/{id}
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let code = match parse_currency_id(&id) {
        Ok(code) => code,
        Err(e) => return error_response(&e),
    };

    match state.db.get_currency(code) {
        Ok(Some(currency)) => {
            Json(ApiResponse::success_with_data(compat::user_from_currency(&currency)))
                .into_response()
        }
        Ok(None) => error_response(&AppError::NotFound("Moneda no encontrada".to_string())),
        Err(e) => {
            error!("Failed to read currency {} for user shim: {}", code, e);
            error_response(&e)
        }
    }
}

/// GET /api/users/{id}/posts
pub async fn get_user_posts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let code = match parse_currency_id(&id) {
        Ok(code) => code,
        Err(e) => return error_response(&e),
    };

    match state.db.get_rate_history(code, None, None) {
        Ok(rows) => {
            Json(ApiResponse::success_with_data(compat::user_posts(code, rows))).into_response()
        }
        Err(e) => {
            error!("Failed to read history for user {} posts: {}", code, e);
            error_response(&e)
        }
    }
}

/// GET /api/posts
pub async fn get_posts(State(state): State<Arc<AppState>>) -> Response {
    match state.db.get_current_rates() {
        Ok(rates) => {
            let posts: Vec<PostRecord> = rates.iter().map(compat::post_from_rate).collect();
            let count = posts.len();
            Json(ApiResponse::success_with_data(posts).with_count(count)).into_response()
        }
        Err(e) => {
            error!("Failed to read rates for post shim: {}", e);
            error_response(&e)
        }
    }
}

/// GET /api/posts/{id}
pub async fn get_post_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let code = match parse_currency_id(&id) {
        Ok(code) => code,
        Err(e) => return error_response(&e),
    };

    match state.db.get_current_rates() {
        Ok(rates) => match rates.iter().find(|r| r.currency_code == code) {
            Some(rate) => {
                Json(ApiResponse::success_with_data(compat::post_from_rate(rate))).into_response()
            }
            None => {
                error_response(&AppError::NotFound("Tipo de cambio no encontrado".to_string()))
            }
        },
        Err(e) => {
            error!("Failed to read rates for post {}: {}", code, e);
            error_response(&e)
        }
    }
}

// ============================================================================
// Health, info and diagnostics
// ============================================================================

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.db.ping() {
        Ok(()) => "OK",
        Err(e) => {
            error!("Health check database probe failed: {}", e);
            "ERROR"
        }
    };

    Json(json!({
        "status": "OK",
        "message": "Backend funcionando correctamente",
        "services": {
            "database": database,
            "soap_api": "OK",
        },
        "timestamp": now_rfc3339(),
        "environment": std::env::var("BANGUAT_ENV").unwrap_or_else(|_| "development".to_string()),
    }))
    .into_response()
}

/// GET /info
pub async fn info(State(state): State<Arc<AppState>>) -> Response {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "rates": "/api/rates",
            "rate_history": "/api/rates/{currency_id}",
            "currencies": "/api/currencies",
            "dollar_rate": "/api/dollar",
            "update_data": "POST /api/refresh",
            "statistics": "/api/stats",
            "health_check": "/health",
            "compatibility": {
                "users": "/api/users",
                "posts": "/api/posts",
            },
        },
        "database": {
            "path": state.config.db_path.display().to_string(),
        },
        "soap_api": {
            "url": state.client.url(),
        },
        "timestamp": now_rfc3339(),
    }))
    .into_response()
}

/// GET /api/test/soap
pub async fn test_soap(State(state): State<Arc<AppState>>) -> Response {
    match state.client.probe().await {
        Ok((status_code, content_length)) => Json(
            ApiResponse::success_with_data(json!({
                "soapUrl": state.client.url(),
                "statusCode": status_code,
                "contentLength": content_length,
            }))
            .with_message("Conexión SOAP exitosa"),
        )
        .into_response(),
        Err(e) => {
            error!("SOAP connectivity test failed: {}", e);
            error_response(&e)
        }
    }
}

/// GET /api/test/database
pub async fn test_database(State(state): State<Arc<AppState>>) -> Response {
    match state.db.ping() {
        Ok(()) => Json(
            ApiResponse::success_with_data(json!({
                "database": state.config.db_path.display().to_string(),
            }))
            .with_message("Conexión a base de datos exitosa"),
        )
        .into_response(),
        Err(e) => {
            error!("Database connectivity test failed: {}", e);
            error_response(&e)
        }
    }
}

/// Any unmatched route
pub async fn fallback(uri: Uri) -> Response {
    let envelope = ApiResponse {
        success: false,
        data: Some(json!({
            "path": uri.path(),
            "suggestion": "Visite /info para ver endpoints disponibles",
        })),
        count: None,
        source: None,
        message: Some("Ruta no encontrada".to_string()),
        error: Some("NOT_FOUND".to_string()),
        timestamp: now_rfc3339(),
    };

    (StatusCode::NOT_FOUND, Json(envelope)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_id() {
        assert_eq!(parse_currency_id("3").unwrap(), 3);
        assert_eq!(parse_currency_id(" 42 ").unwrap(), 42);

        let err = parse_currency_id("abc").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(parse_currency_id("").is_err());
        assert!(parse_currency_id("3.5").is_err());
    }

    #[test]
    fn test_simulated_rates_shape() {
        let rates = simulated_rates();
        assert_eq!(rates.len(), 3);

        let codes: Vec<i64> = rates.iter().map(|r| r.currency_code).collect();
        assert_eq!(codes, vec![2, 3, 4]);

        for rate in &rates {
            assert!(rate.buy.is_none());
            assert!(rate.sell.is_none());
            assert!(rate.reference.is_some());
        }
        assert_eq!(rates[0].reference, Some(7.75));
        assert_eq!(rates[2].symbol.as_deref(), Some("£"));
    }
}
