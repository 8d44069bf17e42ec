//! SQLite persistence layer for the creature catalog.
//!
//! Provides schema creation, the write operations used by reconciliation,
//! and the read queries behind listings and lookups, backed by SQLite
//! (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    StoreError, UpsertOutcome, ensure_ability_tag, ensure_type_tag, insert_import_log,
    set_favorite, set_relations, toggle_favorite, upsert_entry, with_savepoint,
};
pub use queries::{
    CatalogStats, ListFilter, abilities_for_entry, catalog_stats, count_entries, entries_exist,
    find_ability_tag, find_type_tag, get_entry, get_entry_record, list_entries, list_import_logs,
    list_type_names, types_for_entry,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};
