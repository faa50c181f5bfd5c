use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use tracing::debug;

use crate::error::DeskError;

use super::migrations;

pub const DESK_DIR: &str = ".admitdesk";
const DB_FILE: &str = "admitdesk.db";
const CONFIG_FILE: &str = "config.json";

/// Locate the data directory: `$ADMITDESK_HOME` if set, otherwise the nearest
/// ancestor of the current directory that holds a `.admitdesk/` folder.
pub fn find_desk_dir() -> Result<PathBuf, DeskError> {
    if let Some(home) = env::var_os("ADMITDESK_HOME") {
        return Ok(PathBuf::from(home));
    }
    let mut dir = env::current_dir()?;
    loop {
        let candidate = dir.join(DESK_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(DeskError::not_initialized());
        }
    }
}

/// Directory `init` creates: `$ADMITDESK_HOME`, or `.admitdesk/` in the
/// current directory.
fn init_desk_dir() -> Result<PathBuf, DeskError> {
    if let Some(home) = env::var_os("ADMITDESK_HOME") {
        return Ok(PathBuf::from(home));
    }
    Ok(env::current_dir()?.join(DESK_DIR))
}

pub fn db_path() -> Result<PathBuf, DeskError> {
    Ok(find_desk_dir()?.join(DB_FILE))
}

pub fn config_path() -> Result<PathBuf, DeskError> {
    Ok(find_desk_dir()?.join(CONFIG_FILE))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, DeskError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(DeskError::not_initialized());
    }
    debug!(path = %path.display(), "opening database");
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Create the data directory and database, then run migrations. Idempotent.
pub fn init_db() -> Result<PathBuf, DeskError> {
    let dir = init_desk_dir()?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(DB_FILE);
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

/// In-memory database with the full schema.
pub fn open_in_memory() -> Result<Connection, DeskError> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), DeskError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}
