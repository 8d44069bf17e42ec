//! Read queries for the catalog database.
//!
//! Provides single-entry lookup with relations, filtered listing in id
//! order, type name listing, and statistics.

use dexcache_catalog::types::*;
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::{StoreError, with_savepoint};

const ENTRY_COLUMNS: &str = "id, name, height, weight,
    sprite_front_default, sprite_back_default, sprite_front_shiny,
    sprite_back_shiny, sprite_official_artwork,
    hp, attack, defense, special_attack, special_defense, speed,
    favorite, created_at, updated_at";

/// Filters applied to entry listings. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring of the entry name.
    pub name_contains: Option<String>,
    /// Case-insensitive exact match against any related type tag.
    pub type_equals: Option<String>,
    /// Only entries marked as favorite.
    pub favorites_only: bool,
}

impl ListFilter {
    fn name_param(&self) -> Option<&str> {
        self.name_contains.as_deref().filter(|s| !s.is_empty())
    }

    fn type_param(&self) -> Option<&str> {
        self.type_equals.as_deref().filter(|s| !s.is_empty())
    }
}

// Shared WHERE clause: ?1 name, ?2 type, ?3 favorites_only.
const FILTER_SQL: &str = "(?1 IS NULL OR instr(lower(e.name), lower(?1)) > 0)
    AND (?2 IS NULL OR EXISTS (
        SELECT 1 FROM entry_types et
        JOIN type_tags t ON t.id = et.type_id
        WHERE et.entry_id = e.id AND t.name = ?2 COLLATE NOCASE))
    AND (?3 = 0 OR e.favorite = 1)";

// ── Entry Lookups ───────────────────────────────────────────────────────────

/// Fetch an entry row without its relations.
pub fn get_entry(conn: &Connection, id: i64) -> Result<Option<Entry>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"))?;
    stmt.query_row(params![id], row_to_entry)
        .optional()
        .map_err(Into::into)
}

/// Fetch an entry with its types and abilities, read as one snapshot.
pub fn get_entry_record(conn: &Connection, id: i64) -> Result<Option<EntryRecord>, StoreError> {
    with_savepoint(conn, "get_entry_record", |conn| {
        let Some(entry) = get_entry(conn, id)? else {
            return Ok(None);
        };
        load_record(conn, entry).map(Some)
    })
}

/// Whether the store holds at least one entry.
pub fn entries_exist(conn: &Connection) -> Result<bool, StoreError> {
    let exists: bool = conn.query_row("SELECT EXISTS(SELECT 1 FROM entries)", [], |row| {
        row.get(0)
    })?;
    Ok(exists)
}

/// List entries matching `filter`, ordered by id ascending.
pub fn list_entries(
    conn: &Connection,
    filter: &ListFilter,
    offset: u64,
    limit: u64,
) -> Result<Vec<EntryRecord>, StoreError> {
    with_savepoint(conn, "list_entries", |conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries e
             WHERE {FILTER_SQL}
             ORDER BY e.id LIMIT ?4 OFFSET ?5"
        ))?;
        let entries = stmt
            .query_map(
                params![
                    filter.name_param(),
                    filter.type_param(),
                    filter.favorites_only,
                    limit as i64,
                    offset as i64,
                ],
                row_to_entry,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        entries
            .into_iter()
            .map(|entry| load_record(conn, entry))
            .collect()
    })
}

/// Count entries matching `filter`.
pub fn count_entries(conn: &Connection, filter: &ListFilter) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM entries e WHERE {FILTER_SQL}"),
        params![
            filter.name_param(),
            filter.type_param(),
            filter.favorites_only,
        ],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

// ── Relation Lookups ────────────────────────────────────────────────────────

/// Types related to an entry, in slot order.
pub fn types_for_entry(conn: &Connection, entry_id: i64) -> Result<Vec<TypeTag>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name FROM entry_types et
         JOIN type_tags t ON t.id = et.type_id
         WHERE et.entry_id = ?1 ORDER BY et.slot",
    )?;
    let rows = stmt.query_map(params![entry_id], |row| {
        Ok(TypeTag {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Abilities related to an entry, in slot order.
pub fn abilities_for_entry(
    conn: &Connection,
    entry_id: i64,
) -> Result<Vec<AbilityTag>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name, a.is_hidden FROM entry_abilities ea
         JOIN ability_tags a ON a.id = ea.ability_id
         WHERE ea.entry_id = ?1 ORDER BY ea.slot",
    )?;
    let rows = stmt.query_map(params![entry_id], |row| {
        Ok(AbilityTag {
            id: row.get(0)?,
            name: row.get(1)?,
            is_hidden: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Tag Lookups ─────────────────────────────────────────────────────────────

/// Find a type tag by name (case-insensitive).
pub fn find_type_tag(conn: &Connection, name: &str) -> Result<Option<TypeTag>, StoreError> {
    conn.query_row(
        "SELECT id, name FROM type_tags WHERE name = ?1",
        params![name],
        |row| {
            Ok(TypeTag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// Find an ability tag by its normalized name (exact match).
pub fn find_ability_tag(conn: &Connection, name: &str) -> Result<Option<AbilityTag>, StoreError> {
    conn.query_row(
        "SELECT id, name, is_hidden FROM ability_tags WHERE name = ?1",
        params![name],
        |row| {
            Ok(AbilityTag {
                id: row.get(0)?,
                name: row.get(1)?,
                is_hidden: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// All distinct type names, sorted.
pub fn list_type_names(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM type_tags ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, StoreError> {
    let entries: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))?;
    let favorites: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE favorite = 1",
        [],
        |r| r.get(0),
    )?;
    let types: i64 = conn.query_row("SELECT COUNT(*) FROM type_tags", [], |r| r.get(0))?;
    let abilities: i64 = conn.query_row("SELECT COUNT(*) FROM ability_tags", [], |r| r.get(0))?;
    let imports: i64 = conn.query_row("SELECT COUNT(*) FROM import_log", [], |r| r.get(0))?;

    Ok(CatalogStats {
        entries,
        favorites,
        types,
        abilities,
        imports,
    })
}

/// Summary statistics for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub entries: i64,
    pub favorites: i64,
    pub types: i64,
    pub abilities: i64,
    pub imports: i64,
}

// ── Import Log Queries ──────────────────────────────────────────────────────

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, StoreError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_url, started_at, finished_at,
                references_seen, entries_imported, failures, outcome
         FROM import_log ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        let outcome: String = row.get(7)?;
        Ok(ImportLog {
            id: row.get(0)?,
            source_url: row.get(1)?,
            started_at: row.get(2)?,
            finished_at: row.get(3)?,
            references_seen: row.get(4)?,
            entries_imported: row.get(5)?,
            failures: row.get(6)?,
            outcome: ImportOutcome::from_str_loose(&outcome),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn load_record(conn: &Connection, entry: Entry) -> Result<EntryRecord, StoreError> {
    let types = types_for_entry(conn, entry.id)?;
    let abilities = abilities_for_entry(conn, entry.id)?;
    Ok(EntryRecord {
        entry,
        types,
        abilities,
    })
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        name: row.get(1)?,
        height: row.get(2)?,
        weight: row.get(3)?,
        sprites: Sprites {
            front_default: row.get(4)?,
            back_default: row.get(5)?,
            front_shiny: row.get(6)?,
            back_shiny: row.get(7)?,
            official_artwork: row.get(8)?,
        },
        stats: BaseStats {
            hp: row.get(9)?,
            attack: row.get(10)?,
            defense: row.get(11)?,
            special_attack: row.get(12)?,
            special_defense: row.get(13)?,
            speed: row.get(14)?,
        },
        favorite: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}
