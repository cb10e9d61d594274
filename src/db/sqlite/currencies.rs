//! Currency catalog table

use rusqlite::{params, Connection};

use crate::db::sqlite::models::Currency;
use crate::error::Result;

/// Upsert a currency by code. Re-sighting updates description and symbol in
/// place; the code itself never changes and rows are never deleted.
pub fn upsert(
    conn: &Connection,
    code: i64,
    description: &str,
    symbol: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO currencies (code, description, symbol)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(code) DO UPDATE SET
           description = excluded.description,
           symbol = excluded.symbol,
           updated_at = datetime('now')",
        params![code, description, symbol],
    )?;
    Ok(())
}

/// Active currencies ordered by description
pub fn get_active(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt = conn.prepare(
        "SELECT code, description, symbol, active
         FROM currencies
         WHERE active = 1
         ORDER BY description",
    )?;

    let currencies = stmt
        .query_map([], |row| {
            Ok(Currency {
                code: row.get(0)?,
                description: row.get(1)?,
                symbol: row.get(2)?,
                active: row.get(3)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(currencies)
}

/// Look up one currency by code
pub fn get_by_code(conn: &Connection, code: i64) -> Result<Option<Currency>> {
    let result = conn.query_row(
        "SELECT code, description, symbol, active FROM currencies WHERE code = ?1",
        params![code],
        |row| {
            Ok(Currency {
                code: row.get(0)?,
                description: row.get(1)?,
                symbol: row.get(2)?,
                active: row.get(3)?,
            })
        },
    );

    match result {
        Ok(currency) => Ok(Some(currency)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Number of active currencies
pub fn count_active(conn: &Connection) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM currencies WHERE active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
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
    fn test_upsert_updates_seeded_row_in_place() {
        let conn = create_test_db();
        assert_eq!(count_active(&conn).unwrap(), 10);

        upsert(&conn, 3, "Euro Zona Euro", Some("€")).unwrap();

        assert_eq!(count_active(&conn).unwrap(), 10);
        let euro = get_by_code(&conn, 3).unwrap().unwrap();
        assert_eq!(euro.description, "Euro Zona Euro");
    }

    #[test]
    fn test_first_sighting_creates_row() {
        let conn = create_test_db();

        upsert(&conn, 11, "Franco Suizo", None).unwrap();

        assert_eq!(count_active(&conn).unwrap(), 11);
        let franc = get_by_code(&conn, 11).unwrap().unwrap();
        assert_eq!(franc.description, "Franco Suizo");
        assert_eq!(franc.symbol, None);
        assert!(franc.active);
    }

    #[test]
    fn test_get_active_orders_by_description() {
        let conn = create_test_db();

        let descriptions: Vec<String> = get_active(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.description)
            .collect();
        assert_eq!(descriptions.len(), 10);
        assert!(descriptions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_deactivated_currencies_are_hidden_not_deleted() {
        let conn = create_test_db();

        conn.execute("UPDATE currencies SET active = 0 WHERE code = 3", [])
            .unwrap();

        assert_eq!(count_active(&conn).unwrap(), 9);
        assert!(get_active(&conn).unwrap().iter().all(|c| c.code != 3));

        // Still present, and re-sighting does not reactivate it.
        upsert(&conn, 3, "Euro", Some("€")).unwrap();
        let euro = get_by_code(&conn, 3).unwrap().unwrap();
        assert!(!euro.active);
    }

    #[test]
    fn test_get_by_code_missing_returns_none() {
        let conn = create_test_db();
        assert!(get_by_code(&conn, 42).unwrap().is_none());
    }
}
