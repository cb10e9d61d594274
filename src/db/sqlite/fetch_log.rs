//! Fetch audit log table
//!
//! Append-only. Exactly one row is written per SOAP fetch attempt, whether
//! it succeeded or not.

use rusqlite::{params, Connection};

use crate::error::Result;

/// Record one fetch attempt
pub fn log_fetch(
    conn: &Connection,
    endpoint: &str,
    method: &str,
    status_code: Option<i64>,
    latency_ms: i64,
    record_count: i64,
    error_message: Option<&str>,
    requester_ip: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO fetch_log (endpoint, method, status_code, latency_ms, record_count, error_message, requester_ip)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            endpoint,
            method,
            status_code,
            latency_ms,
            record_count,
            error_message,
            requester_ip
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Today's fetch count, average latency and last fetch timestamp
pub fn today_summary(conn: &Connection) -> Result<(i64, f64, Option<String>)> {
    let (count, avg_latency, last_fetch) = conn.query_row(
        "SELECT COUNT(*), COALESCE(AVG(latency_ms), 0), MAX(created_at)
         FROM fetch_log
         WHERE date(created_at) = date('now')",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    Ok((count, avg_latency, last_fetch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::{connection, migrations};

    fn create_test_db() -> Connection {
        let conn = connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM fetch_log", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_success_and_failure_rows_both_append() {
        let conn = create_test_db();

        let first = log_fetch(
            &conn,
            "https://www.banguat.gob.gt/variables/ws/tipocambio.asmx",
            "POST",
            Some(200),
            412,
            2,
            None,
            Some("10.0.0.5"),
        )
        .unwrap();
        let second = log_fetch(
            &conn,
            "https://www.banguat.gob.gt/variables/ws/tipocambio.asmx",
            "POST",
            Some(504),
            30_000,
            0,
            Some("Remote service timed out"),
            None,
        )
        .unwrap();

        assert!(second > first);
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn test_today_summary_is_scoped_to_today() {
        let conn = create_test_db();

        log_fetch(&conn, "soap", "POST", Some(200), 100, 2, None, None).unwrap();
        log_fetch(&conn, "soap", "POST", Some(200), 300, 2, None, None).unwrap();
        // Backdated row must not count.
        conn.execute(
            "INSERT INTO fetch_log (endpoint, method, status_code, latency_ms, record_count, created_at)
             VALUES ('soap', 'POST', 200, 999, 2, datetime('now', '-2 days'))",
            [],
        )
        .unwrap();

        let (today, avg_latency, last_fetch) = today_summary(&conn).unwrap();
        assert_eq!(today, 2);
        assert_eq!(avg_latency, 200.0);
        assert!(last_fetch.is_some());
        assert_eq!(count(&conn), 3);
    }

    #[test]
    fn test_today_summary_on_empty_log() {
        let conn = create_test_db();
        let (today, avg_latency, last_fetch) = today_summary(&conn).unwrap();
        assert_eq!(today, 0);
        assert_eq!(avg_latency, 0.0);
        assert!(last_fetch.is_none());
    }
}
