use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        // v1: requests table. `seq` orders rows that share a timestamp.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS requests (
                 seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                 id          TEXT NOT NULL UNIQUE,
                 title       TEXT NOT NULL DEFAULT '',
                 body        TEXT NOT NULL DEFAULT '',
                 image_url   TEXT NOT NULL DEFAULT '',
                 created_at  TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_requests_created
                 ON requests(created_at DESC, seq DESC);",
        )
        .to_db()?;
        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
            [],
        )
        .to_db()?;
    }

    Ok(())
}
