//! Dollar reference snapshot table
//!
//! Kept separate from `exchange_rates` even though the dollar's reference
//! value also lands there under currency code 2; the two write paths are
//! independent and a fetch may update either without the other.

use rusqlite::{params, Connection};

use crate::db::sqlite::models::DollarSnapshot;
use crate::error::Result;

/// Upsert the dollar reference for one date
pub fn upsert(conn: &Connection, date: &str, reference: f64) -> Result<()> {
    conn.execute(
        "INSERT INTO dollar_snapshots (date, reference, fetched_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(date) DO UPDATE SET
           reference = excluded.reference,
           fetched_at = excluded.fetched_at",
        params![date, reference],
    )?;
    Ok(())
}

/// Most recent snapshot by date, `None` before the first fetch
pub fn get_current(conn: &Connection) -> Result<Option<DollarSnapshot>> {
    let result = conn.query_row(
        "SELECT date, reference, fetched_at
         FROM dollar_snapshots
         ORDER BY date DESC
         LIMIT 1",
        [],
        |row| {
            Ok(DollarSnapshot {
                date: row.get(0)?,
                reference: row.get(1)?,
                fetched_at: row.get(2)?,
            })
        },
    );

    match result {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
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

    #[test]
    fn test_empty_store_has_no_current_snapshot() {
        let conn = create_test_db();
        assert!(get_current(&conn).unwrap().is_none());
    }

    #[test]
    fn test_upsert_by_date_overwrites_reference() {
        let conn = create_test_db();

        upsert(&conn, "2025-04-17", 7.70).unwrap();
        upsert(&conn, "2025-04-17", 7.69).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM dollar_snapshots", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);

        let current = get_current(&conn).unwrap().unwrap();
        assert_eq!(current.reference, 7.69);
    }

    #[test]
    fn test_current_is_latest_by_date_not_by_insert_order() {
        let conn = create_test_db();

        upsert(&conn, "2025-04-17", 7.69).unwrap();
        upsert(&conn, "2025-04-15", 7.72).unwrap();

        let current = get_current(&conn).unwrap().unwrap();
        assert_eq!(current.date, "2025-04-17");
    }

    #[test]
    fn test_negative_reference_is_rejected() {
        let conn = create_test_db();
        assert!(upsert(&conn, "2025-04-17", -7.69).is_err());
        assert!(get_current(&conn).unwrap().is_none());
    }
}
