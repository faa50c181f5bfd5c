//! Key-value storage with browser-style scopes. `Local` entries persist until
//! removed; `Session` entries are scratch copies wiped by `cache clear`.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Session,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
        }
    }
}

pub fn get_item(conn: &Connection, scope: Scope, key: &str) -> Result<Option<String>, DeskError> {
    let value = conn
        .query_row(
            "SELECT value FROM storage WHERE scope = ?1 AND key = ?2",
            params![scope.as_str(), key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_item(conn: &Connection, scope: Scope, key: &str, value: &str) -> Result<(), DeskError> {
    conn.execute(
        "INSERT INTO storage (scope, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        params![scope.as_str(), key, value],
    )?;
    Ok(())
}

pub fn remove_item(conn: &Connection, scope: Scope, key: &str) -> Result<bool, DeskError> {
    let changed = conn.execute(
        "DELETE FROM storage WHERE scope = ?1 AND key = ?2",
        params![scope.as_str(), key],
    )?;
    Ok(changed > 0)
}

/// Remove every entry in a scope. Returns the number of entries removed.
pub fn clear_scope(conn: &Connection, scope: Scope) -> Result<usize, DeskError> {
    let changed = conn.execute("DELETE FROM storage WHERE scope = ?1", params![scope.as_str()])?;
    Ok(changed)
}

pub fn keys_with_prefix(conn: &Connection, scope: Scope, prefix: &str) -> Result<Vec<String>, DeskError> {
    let mut stmt = conn.prepare(
        "SELECT key FROM storage WHERE scope = ?1 AND substr(key, 1, length(?2)) = ?2 ORDER BY key",
    )?;
    let keys = stmt
        .query_map(params![scope.as_str(), prefix], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(keys)
}

/// Read and decode a JSON value. A missing key is `None`; undecodable JSON is
/// an error.
pub fn get_json<T: DeserializeOwned>(conn: &Connection, scope: Scope, key: &str) -> Result<Option<T>, DeskError> {
    match get_item(conn, scope, key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn set_json<T: Serialize>(conn: &Connection, scope: Scope, key: &str, value: &T) -> Result<(), DeskError> {
    let raw = serde_json::to_string(value)?;
    set_item(conn, scope, key, &raw)
}
