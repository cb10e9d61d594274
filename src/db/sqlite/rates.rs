//! Historical exchange-rate table

use rusqlite::{params, Connection};

use crate::db::sqlite::models::RateRow;
use crate::error::Result;

/// Upsert one quote by (currency_code, date). Re-fetching a day overwrites
/// the non-key columns of the existing row instead of duplicating it.
pub fn upsert(
    conn: &Connection,
    currency_code: i64,
    date: &str,
    buy: Option<f64>,
    sell: Option<f64>,
    reference: Option<f64>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO exchange_rates (currency_code, date, buy, sell, reference, active, fetched_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, datetime('now'))
         ON CONFLICT(currency_code, date) DO UPDATE SET
           buy = excluded.buy,
           sell = excluded.sell,
           reference = excluded.reference,
           active = 1,
           fetched_at = excluded.fetched_at",
        params![currency_code, date, buy, sell, reference],
    )?;
    Ok(())
}

const RATE_ROW_COLUMNS: &str = "r.currency_code, c.description, c.symbol, r.date, \
                                r.buy, r.sell, r.reference, r.fetched_at";

fn map_rate_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RateRow> {
    Ok(RateRow {
        currency_code: row.get(0)?,
        description: row.get(1)?,
        symbol: row.get(2)?,
        date: row.get(3)?,
        buy: row.get(4)?,
        sell: row.get(5)?,
        reference: row.get(6)?,
        fetched_at: row.get(7)?,
    })
}

/// Most recent active quote per currency, joined with catalog metadata and
/// ordered by currency description. Quotes whose code has no catalog row
/// are not current rates; they stay in history until the catalog catches up.
pub fn get_current(conn: &Connection) -> Result<Vec<RateRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {}
         FROM exchange_rates r
         JOIN currencies c ON c.code = r.currency_code
         WHERE r.active = 1
           AND r.date = (SELECT MAX(r2.date)
                         FROM exchange_rates r2
                         WHERE r2.currency_code = r.currency_code
                           AND r2.active = 1)
         ORDER BY c.description",
        RATE_ROW_COLUMNS
    ))?;

    let rows = stmt
        .query_map([], map_rate_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(rows)
}

/// History for one currency, newest first, optionally bounded by an
/// inclusive date range.
pub fn get_history(
    conn: &Connection,
    currency_code: i64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<RateRow>> {
    let mut sql = format!(
        "SELECT {}
         FROM exchange_rates r
         JOIN currencies c ON c.code = r.currency_code
         WHERE r.currency_code = ? AND r.active = 1",
        RATE_ROW_COLUMNS
    );
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(currency_code)];

    if let Some(from) = from {
        sql.push_str(" AND r.date >= ?");
        values.push(Box::new(from.to_string()));
    }
    if let Some(to) = to {
        sql.push_str(" AND r.date <= ?");
        values.push(Box::new(to.to_string()));
    }
    sql.push_str(" ORDER BY r.date DESC");

    let mut stmt = conn.prepare(&sql)?;
    let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

    let rows = stmt
        .query_map(value_refs.as_slice(), map_rate_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(rows)
}

/// Number of active historical quotes
pub fn count_active(conn: &Connection) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM exchange_rates WHERE active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Timestamp of the most recent active quote write
pub fn last_update(conn: &Connection) -> Result<Option<String>> {
    let last = conn.query_row(
        "SELECT MAX(fetched_at) FROM exchange_rates WHERE active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(last)
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
    fn test_upsert_is_idempotent_per_currency_and_date() {
        let conn = create_test_db();

        upsert(&conn, 3, "2025-01-02", Some(8.30), Some(8.45), None).unwrap();
        upsert(&conn, 3, "2025-01-02", Some(8.35), Some(8.50), None).unwrap();

        let history = get_history(&conn, 3, None, None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].buy, Some(8.35));
        assert_eq!(history[0].sell, Some(8.50));
    }

    #[test]
    fn test_dollar_reference_row_keeps_buy_sell_absent() {
        let conn = create_test_db();

        upsert(&conn, 2, "2025-04-17", None, None, Some(7.69)).unwrap();

        let history = get_history(&conn, 2, None, None).unwrap();
        assert_eq!(history[0].buy, None);
        assert_eq!(history[0].sell, None);
        assert_eq!(history[0].reference, Some(7.69));
    }

    #[test]
    fn test_get_current_returns_latest_row_per_currency() {
        let conn = create_test_db();

        upsert(&conn, 2, "2025-04-16", None, None, Some(7.70)).unwrap();
        upsert(&conn, 2, "2025-04-17", None, None, Some(7.69)).unwrap();
        upsert(&conn, 3, "2025-04-16", Some(8.30), Some(8.45), None).unwrap();

        let current = get_current(&conn).unwrap();
        assert_eq!(current.len(), 2);

        let dollar = current.iter().find(|r| r.currency_code == 2).unwrap();
        assert_eq!(dollar.date, "2025-04-17");
        assert_eq!(dollar.reference, Some(7.69));
        assert_eq!(dollar.symbol.as_deref(), Some("$"));

        let euro = current.iter().find(|r| r.currency_code == 3).unwrap();
        assert_eq!(euro.date, "2025-04-16");
    }

    #[test]
    fn test_get_current_requires_catalog_row() {
        let conn = create_test_db();

        // Code 77 has no catalog entry; its quote must not surface.
        upsert(&conn, 77, "2025-04-17", Some(1.0), Some(1.1), None).unwrap();

        assert!(get_current(&conn).unwrap().is_empty());
        assert_eq!(count_active(&conn).unwrap(), 1);
    }

    #[test]
    fn test_history_range_bounds_are_inclusive() {
        let conn = create_test_db();

        for (date, reference) in [
            ("2025-04-14", 7.72),
            ("2025-04-15", 7.71),
            ("2025-04-16", 7.70),
            ("2025-04-17", 7.69),
        ] {
            upsert(&conn, 2, date, None, None, Some(reference)).unwrap();
        }

        let dates: Vec<String> = get_history(&conn, 2, Some("2025-04-15"), Some("2025-04-16"))
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["2025-04-16", "2025-04-15"]);

        let from_only = get_history(&conn, 2, Some("2025-04-16"), None).unwrap();
        assert_eq!(from_only.len(), 2);

        let unbounded = get_history(&conn, 2, None, None).unwrap();
        assert_eq!(unbounded.len(), 4);
        assert_eq!(unbounded[0].date, "2025-04-17");
    }

    #[test]
    fn test_history_for_unknown_currency_is_empty() {
        let conn = create_test_db();
        assert!(get_history(&conn, 42, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let conn = create_test_db();
        let result = upsert(&conn, 3, "2025-01-02", Some(-1.0), Some(8.45), None);
        assert!(result.is_err());
        assert!(get_history(&conn, 3, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_last_update_tracks_writes() {
        let conn = create_test_db();
        assert!(last_update(&conn).unwrap().is_none());

        upsert(&conn, 2, "2025-04-17", None, None, Some(7.69)).unwrap();
        assert!(last_update(&conn).unwrap().is_some());
    }
}
