use rusqlite::Connection;
use timewire_core::db::migrations::{latest_schema_version, schema_version};
use timewire_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_schema_version());
    assert_table_exists(&conn, "temporal_columns");
    assert_index_exists(&conn, "idx_temporal_columns_record");
    assert_index_exists(&conn, "idx_temporal_columns_connector");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timewire.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_schema_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_schema_version());
    assert_table_exists(&conn_second, "temporal_columns");
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
            assert_eq!(supported, latest_schema_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn storage_kind_must_match_populated_value() {
    let conn = open_db_in_memory().unwrap();

    let mismatched = conn.execute(
        "INSERT INTO temporal_columns (
            table_name, primary_key, column_name, connector, storage_kind, value_integer, value_text
        ) VALUES ('events', 'e1', 'occurred_at', 'pg', 'text', 42, NULL);",
        [],
    );
    assert!(mismatched.is_err());

    let unknown_kind = conn.execute(
        "INSERT INTO temporal_columns (
            table_name, primary_key, column_name, connector, storage_kind, value_integer, value_text
        ) VALUES ('events', 'e1', 'occurred_at', 'pg', 'blob', 42, NULL);",
        [],
    );
    assert!(unknown_kind.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
