//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;

/// Open a connection and apply the pragmas the server relies on
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    // The bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1; the
    // schema's REFERENCES clauses are documentation only, so restore the
    // stock SQLite default of unenforced foreign keys.
    conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
    Ok(conn)
}

/// In-memory connection for tests
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
    Ok(conn)
}
