use rusqlite::Connection;

use crate::error::DeskError;

pub fn run_migrations(conn: &Connection) -> Result<(), DeskError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS storage (
            scope TEXT NOT NULL CHECK (scope IN ('local', 'session')),
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope, key)
        );
        ",
    )?;
    Ok(())
}
