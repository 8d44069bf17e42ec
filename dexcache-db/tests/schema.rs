use dexcache_db::schema::{CURRENT_VERSION, create_schema, get_schema_version};
use dexcache_db::{Connection, SchemaError, open_database, open_memory};
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(version, CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    // Creating again should not error
    create_schema(&conn).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    let tables = [
        "schema_version",
        "entries",
        "type_tags",
        "ability_tags",
        "entry_types",
        "entry_abilities",
        "import_log",
    ];
    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn open_database_creates_parent_dirs_and_reopens() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("catalog.db");

    {
        let conn = open_database(&path).unwrap();
        conn.execute(
            "INSERT INTO type_tags (name) VALUES ('fire')",
            [],
        )
        .unwrap();
    }

    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM type_tags", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn reopen_does_not_add_version_rows() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");

    drop(open_database(&path).unwrap());
    let conn = open_database(&path).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(get_schema_version(&conn).unwrap(), 1);
}

#[test]
fn newer_database_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("future.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (
                 version INTEGER NOT NULL,
                 applied_at TEXT NOT NULL DEFAULT (datetime('now'))
             );
             INSERT INTO schema_version (version) VALUES (99);",
        )
        .unwrap();
    }

    assert!(matches!(
        open_database(&path),
        Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: 99
        })
    ));
}
