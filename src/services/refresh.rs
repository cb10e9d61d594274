//! Refresh Service
//!
//! Runs one update cycle against the Banguat SOAP endpoint: fetch and
//! normalize the day's feed, persist it record by record, and append one
//! fetch-log row for the attempt. Called by the refresh endpoint.

use crate::banguat::NormalizedFeed;
use crate::db::SqliteDb;
use crate::error::Result;
use crate::state::AppState;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, warn};

/// One record that could not be persisted
#[derive(Debug, Clone, Serialize)]
pub struct PersistFailure {
    pub kind: String,
    pub key: String,
    pub reason: String,
}

/// Outcome of one persistence pass over a normalized feed
#[derive(Debug, Clone, Default)]
pub struct PersistReport {
    pub currencies_saved: usize,
    pub quotes_saved: usize,
    pub snapshots_saved: usize,
    pub failures: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn saved(&self) -> usize {
        self.currencies_saved + self.quotes_saved + self.snapshots_saved
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Result of a refresh cycle, serialized by the refresh endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    #[serde(rename = "totalRegistros")]
    pub total_records: i64,
    #[serde(rename = "tiempoRespuesta")]
    pub latency_ms: i64,
    pub saved: usize,
    pub failures: Vec<PersistFailure>,
}

/// Refresh service for the fetch-persist-log cycle
pub struct RefreshService;

impl RefreshService {
    /// Fetch the day's rates and persist them.
    ///
    /// Exactly one fetch-log row is written per call, on success and on
    /// every failure path alike.
    pub async fn run(state: &AppState, requester_ip: Option<&str>) -> Result<RefreshSummary> {
        info!("RefreshService::run - requesting current rates");
        let started = Instant::now();

        match state.client.fetch_day().await {
            Ok(feed) => {
                let report = Self::persist_day(&state.db, &feed);
                let latency_ms = started.elapsed().as_millis() as i64;

                if let Err(e) = state.db.log_fetch(
                    state.client.url(),
                    "POST",
                    Some(200),
                    latency_ms,
                    feed.record_count(),
                    None,
                    requester_ip,
                ) {
                    warn!("Failed to write fetch log entry: {}", e);
                }

                info!(
                    "Refresh complete: {} records, {} saved, {} failed in {}ms",
                    feed.record_count(),
                    report.saved(),
                    report.failed(),
                    latency_ms
                );

                Ok(RefreshSummary {
                    total_records: feed.record_count(),
                    latency_ms,
                    saved: report.saved(),
                    failures: report.failures,
                })
            }
            Err(e) => {
                let latency_ms = started.elapsed().as_millis() as i64;
                let status = e.status_code().as_u16() as i64;

                if let Err(log_err) = state.db.log_fetch(
                    state.client.url(),
                    "POST",
                    Some(status),
                    latency_ms,
                    0,
                    Some(&e.to_string()),
                    requester_ip,
                ) {
                    warn!("Failed to write fetch log entry: {}", log_err);
                }

                error!("Refresh failed after {}ms: {}", latency_ms, e);
                Err(e)
            }
        }
    }

    /// Persist a normalized feed record by record.
    ///
    /// Best effort: a record that fails is logged, reported, and skipped;
    /// the remaining records are still written. Never returns an error.
    pub fn persist_day(db: &SqliteDb, feed: &NormalizedFeed) -> PersistReport {
        let mut report = PersistReport::default();

        for currency in &feed.currencies {
            match db.upsert_currency(currency.code, &currency.description, currency.symbol.as_deref())
            {
                Ok(()) => report.currencies_saved += 1,
                Err(e) => {
                    warn!("Skipping currency {}: {}", currency.code, e);
                    report.failures.push(PersistFailure {
                        kind: "currency".to_string(),
                        key: currency.code.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for quote in &feed.quotes {
            match db.upsert_rate(
                quote.currency_code,
                &quote.date,
                quote.buy,
                quote.sell,
                quote.reference,
            ) {
                Ok(()) => report.quotes_saved += 1,
                Err(e) => {
                    warn!("Skipping rate {} @ {}: {}", quote.currency_code, quote.date, e);
                    report.failures.push(PersistFailure {
                        kind: "rate".to_string(),
                        key: format!("{}/{}", quote.currency_code, quote.date),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for snapshot in &feed.snapshots {
            match db.upsert_dollar_snapshot(&snapshot.date, snapshot.reference) {
                Ok(()) => report.snapshots_saved += 1,
                Err(e) => {
                    warn!("Skipping dollar snapshot {}: {}", snapshot.date, e);
                    report.failures.push(PersistFailure {
                        kind: "dollar".to_string(),
                        key: snapshot.date.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
