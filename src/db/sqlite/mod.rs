//! SQLite database module

pub mod models;
mod connection;
mod currencies;
mod dollar;
mod fetch_log;
mod migrations;
mod rates;

use crate::error::Result;
use models::{Currency, DollarSnapshot, RateRow, RateStats};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Open (or create) the database at `path` and bring the schema up to
    /// date
    pub fn new(path: &Path) -> Result<Self> {
        let conn = connection::open(path)?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        // Run migrations
        db.run_migrations()?;

        Ok(db)
    }

    /// In-memory database, used by tests
    pub fn in_memory() -> Result<Self> {
        let conn = connection::open_in_memory()?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    /// Connectivity check used by the health endpoints
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |_row| Ok(()))?;
        Ok(())
    }

    // ========== Currency Methods ==========

    /// Upsert a currency definition by code
    pub fn upsert_currency(
        &self,
        code: i64,
        description: &str,
        symbol: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock();
        currencies::upsert(&conn, code, description, symbol)
    }

    /// Active currency catalog ordered by description
    pub fn get_currencies(&self) -> Result<Vec<Currency>> {
        let conn = self.conn.lock();
        currencies::get_active(&conn)
    }

    /// One currency by code
    pub fn get_currency(&self, code: i64) -> Result<Option<Currency>> {
        let conn = self.conn.lock();
        currencies::get_by_code(&conn, code)
    }

    // ========== Rate Methods ==========

    /// Upsert one quote by (currency, date)
    pub fn upsert_rate(
        &self,
        currency_code: i64,
        date: &str,
        buy: Option<f64>,
        sell: Option<f64>,
        reference: Option<f64>,
    ) -> Result<()> {
        let conn = self.conn.lock();
        rates::upsert(&conn, currency_code, date, buy, sell, reference)
    }

    /// Latest active quote per currency with catalog metadata
    pub fn get_current_rates(&self) -> Result<Vec<RateRow>> {
        let conn = self.conn.lock();
        rates::get_current(&conn)
    }

    /// History for one currency within an optional inclusive date range
    pub fn get_rate_history(
        &self,
        currency_code: i64,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<RateRow>> {
        let conn = self.conn.lock();
        rates::get_history(&conn, currency_code, from, to)
    }

    // ========== Dollar Snapshot Methods ==========

    /// Upsert the dollar reference for one date
    pub fn upsert_dollar_snapshot(&self, date: &str, reference: f64) -> Result<()> {
        let conn = self.conn.lock();
        dollar::upsert(&conn, date, reference)
    }

    /// Latest dollar snapshot, `None` before the first fetch
    pub fn get_current_dollar(&self) -> Result<Option<DollarSnapshot>> {
        let conn = self.conn.lock();
        dollar::get_current(&conn)
    }

    // ========== Fetch Log Methods ==========

    /// Append one fetch audit row
    pub fn log_fetch(
        &self,
        endpoint: &str,
        method: &str,
        status_code: Option<i64>,
        latency_ms: i64,
        record_count: i64,
        error_message: Option<&str>,
        requester_ip: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        fetch_log::log_fetch(
            &conn,
            endpoint,
            method,
            status_code,
            latency_ms,
            record_count,
            error_message,
            requester_ip,
        )
    }

    // ========== Statistics ==========

    /// Aggregate statistics for the stats endpoint
    pub fn get_stats(&self) -> Result<RateStats> {
        let conn = self.conn.lock();
        let (fetches_today, avg_latency, last_fetch_at) = fetch_log::today_summary(&conn)?;

        Ok(RateStats {
            total_currencies: currencies::count_active(&conn)?,
            total_rates: rates::count_active(&conn)?,
            fetches_today,
            avg_latency_ms: avg_latency.round() as i64,
            last_fetch_at,
            last_rate_update: rates::last_update(&conn)?,
        })
    }
}
