//! SQLite-backed key/value storage.
//!
//! # Invariants
//! - Connections must have migrations applied (`kv_store` table present).
//! - `set_item` replaces the whole slot value; there are no partial writes.

use super::{KeyValueStorage, StorageError, StorageResult};
use crate::db::migrations::{ensure_kv_table, latest_version, schema_state, SchemaState};
use rusqlite::{params, Connection, OptionalExtension};

/// Key/value storage over the `kv_store` table.
pub struct SqliteKeyValueStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStorage<'conn> {
    /// Wraps a connection without checking its schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking it is migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        match schema_state(conn)? {
            SchemaState::Current => {}
            SchemaState::Behind { found } | SchemaState::Ahead { found } => {
                return Err(StorageError::Unavailable(format!(
                    "storage schema version {found} does not match expected {}",
                    latest_version()
                )))
            }
        }
        ensure_kv_table(conn)?;
        Ok(Self::new(conn))
    }
}

impl KeyValueStorage for SqliteKeyValueStorage<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
