use calendar_core::db::migrations::{apply_migrations, latest_version, schema_state, SchemaState};
use calendar_core::db::{open_db, open_db_in_memory, DbError};
use calendar_core::{
    EventStore, KeyValueStorage, NewEvent, SqliteKeyValueStorage, StorageError,
    DEFAULT_STORAGE_KEY,
};
use chrono::NaiveDate;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_store");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrations_report_pending_steps_once() {
    let mut conn = Connection::open_in_memory().unwrap();
    assert_eq!(
        schema_state(&conn).unwrap(),
        SchemaState::Behind { found: 0 }
    );

    assert_eq!(apply_migrations(&mut conn).unwrap(), latest_version() as usize);
    assert_eq!(schema_state(&conn).unwrap(), SchemaState::Current);
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn current_version_without_slot_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foreign.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingKvTable));

    let conn = Connection::open(&path).unwrap();
    let err = SqliteKeyValueStorage::try_new(&conn).err().unwrap();
    assert!(matches!(err, StorageError::Db(DbError::MissingKvTable)));
}

#[test]
fn try_new_rejects_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStorage::try_new(&conn).err().unwrap();
    assert!(matches!(err, StorageError::Unavailable(_)));
}

#[test]
fn set_item_replaces_whole_value() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKeyValueStorage::try_new(&conn).unwrap();

    assert_eq!(storage.get_item("slot").unwrap(), None);
    storage.set_item("slot", "first").unwrap();
    storage.set_item("slot", "second").unwrap();
    assert_eq!(storage.get_item("slot").unwrap().as_deref(), Some("second"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    storage.remove_item("slot").unwrap();
    assert_eq!(storage.get_item("slot").unwrap(), None);
}

#[test]
fn store_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");
    let on = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

    let created = {
        let conn = open_db(&path).unwrap();
        let storage = SqliteKeyValueStorage::try_new(&conn).unwrap();
        let mut store = EventStore::open_default(storage);
        store
            .create(NewEvent::new("Standup", on, "09:00", "09:30").with_description("daily"))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let storage = SqliteKeyValueStorage::try_new(&conn).unwrap();
    let store = EventStore::open_default(storage);
    assert_eq!(store.events(), &[created]);

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [DEFAULT_STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert!(raw.contains("\"date\":\"2024-03-04\""));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
