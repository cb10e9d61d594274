//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Run each migration
    run_migration(conn, "001_currencies", CREATE_CURRENCIES_TABLE)?;
    run_migration(conn, "002_exchange_rates", CREATE_EXCHANGE_RATES_TABLE)?;
    run_migration(conn, "003_dollar_snapshots", CREATE_DOLLAR_SNAPSHOTS_TABLE)?;
    run_migration(conn, "004_fetch_log", CREATE_FETCH_LOG_TABLE)?;
    run_migration(conn, "005_seed_currencies", SEED_CURRENCIES)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    // Check if migration already applied
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_CURRENCIES_TABLE: &str = r#"
CREATE TABLE currencies (
    code INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    symbol TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

// REFERENCES is documentation only: a dollar-only fetch must be able to
// write the code-2 quote before any catalog row exists.
const CREATE_EXCHANGE_RATES_TABLE: &str = r#"
CREATE TABLE exchange_rates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    currency_code INTEGER NOT NULL REFERENCES currencies(code),
    date TEXT NOT NULL,
    buy REAL CHECK (buy IS NULL OR buy >= 0),
    sell REAL CHECK (sell IS NULL OR sell >= 0),
    reference REAL CHECK (reference IS NULL OR reference >= 0),
    active INTEGER NOT NULL DEFAULT 1,
    fetched_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(currency_code, date)
);
CREATE INDEX IF NOT EXISTS idx_exchange_rates_currency ON exchange_rates(currency_code);
CREATE INDEX IF NOT EXISTS idx_exchange_rates_date ON exchange_rates(date);
"#;

const CREATE_DOLLAR_SNAPSHOTS_TABLE: &str = r#"
CREATE TABLE dollar_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE,
    reference REAL NOT NULL CHECK (reference >= 0),
    fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

const CREATE_FETCH_LOG_TABLE: &str = r#"
CREATE TABLE fetch_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    endpoint TEXT NOT NULL,
    method TEXT NOT NULL,
    status_code INTEGER,
    latency_ms INTEGER NOT NULL DEFAULT 0,
    record_count INTEGER NOT NULL DEFAULT 0,
    error_message TEXT,
    requester_ip TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_fetch_log_created ON fetch_log(created_at);
"#;

// Banguat's published catalog. The daily endpoint rarely returns the
// catalog block, so current-rate reads need these rows in place for the
// quote join from day one.
const SEED_CURRENCIES: &str = r#"
INSERT OR IGNORE INTO currencies (code, description, symbol) VALUES
    (1, 'Quetzal', 'Q'),
    (2, 'Dólar de los Estados Unidos de América', '$'),
    (3, 'Euro', '€'),
    (4, 'Libra Esterlina', '£'),
    (5, 'Yen Japonés', '¥'),
    (6, 'Won Coreano', '₩'),
    (7, 'Yuan Chino', '¥'),
    (8, 'Peso Mexicano', '$'),
    (9, 'Real Brasileño', 'R$'),
    (10, 'Peso Argentino', '$');
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::connection;

    #[test]
    fn test_migrations_run_once() {
        let conn = connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // A second run must be a no-op, not a "table already exists" error.
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, 5);
    }

    #[test]
    fn test_catalog_is_seeded() {
        let conn = connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let seeded: i64 = conn
            .query_row("SELECT COUNT(*) FROM currencies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(seeded, 10);

        let symbol: String = conn
            .query_row("SELECT symbol FROM currencies WHERE code = 2", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(symbol, "$");
    }

    #[test]
    fn test_tables_exist_after_migrations() {
        let conn = connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["currencies", "exchange_rates", "dollar_snapshots", "fetch_log"] {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "missing table {}", table);
        }
    }
}
