//! Storage schema steps, tracked through `PRAGMA user_version`.
//!
//! Step `n` of [`STEPS`] upgrades the file to version `n + 1`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const STEPS: &[&str] = &[include_str!("0001_kv_store.sql")];

const KV_TABLE: &str = "kv_store";

/// Where a connection's schema stands relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { found: u32 },
    Ahead { found: u32 },
}

/// Schema version written by the last step this build knows.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Compares the recorded schema version with [`latest_version`].
pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    Ok(if found == latest {
        SchemaState::Current
    } else if found < latest {
        SchemaState::Behind { found }
    } else {
        SchemaState::Ahead { found }
    })
}

/// Runs pending steps in one transaction and returns how many ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = match schema_state(conn)? {
        SchemaState::Current => return Ok(0),
        SchemaState::Ahead { found } => {
            return Err(DbError::SchemaTooNew {
                found,
                supported: latest_version(),
            })
        }
        SchemaState::Behind { found } => found,
    };

    let tx = conn.transaction()?;
    let pending = &STEPS[found as usize..];
    for (offset, sql) in pending.iter().enumerate() {
        tx.execute_batch(sql)?;
        tx.execute_batch(&format!(
            "PRAGMA user_version = {};",
            found as usize + offset + 1
        ))?;
    }
    tx.commit()?;
    Ok(pending.len())
}

/// Fails unless the slot table exists on the connection.
pub fn ensure_kv_table(conn: &Connection) -> DbResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DbError::MissingKvTable)
    }
}
