//! Write operations for entries, tags, relations and import tracking.

use std::collections::HashSet;

use dexcache_catalog::types::*;
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::queries;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl StoreError {
    pub(crate) fn entry_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "entry".to_string(),
            id: id.to_string(),
        }
    }
}

/// Result of an entry upsert.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub entry: Entry,
    /// True when the row did not exist before this call.
    pub created: bool,
}

// ── Entry Operations ────────────────────────────────────────────────────────

/// Create or update an entry's upstream-owned fields.
///
/// A new entry starts with `favorite = false` and zeroed stats for any stat
/// not present in `fields.stats`. An existing entry keeps its `favorite`
/// flag and every stat not present in `fields.stats`.
pub fn upsert_entry(conn: &Connection, fields: &EntryFields) -> Result<UpsertOutcome, StoreError> {
    with_savepoint(conn, "upsert_entry", |conn| {
        let now = timestamp();
        let created = queries::get_entry(conn, fields.id)?.is_none();

        if created {
            insert_entry(conn, fields, &now)?;
        } else {
            update_entry(conn, fields, &now)?;
        }

        let entry = queries::get_entry(conn, fields.id)?
            .ok_or_else(|| StoreError::entry_not_found(fields.id))?;
        Ok(UpsertOutcome { entry, created })
    })
}

fn insert_entry(conn: &Connection, fields: &EntryFields, now: &str) -> Result<(), StoreError> {
    let stats = &fields.stats;
    conn.execute(
        "INSERT INTO entries (id, name, height, weight,
             sprite_front_default, sprite_back_default, sprite_front_shiny,
             sprite_back_shiny, sprite_official_artwork,
             hp, attack, defense, special_attack, special_defense, speed,
             favorite, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
             COALESCE(?10, 0), COALESCE(?11, 0), COALESCE(?12, 0),
             COALESCE(?13, 0), COALESCE(?14, 0), COALESCE(?15, 0),
             0, ?16, ?16)",
        params![
            fields.id,
            fields.name,
            fields.height,
            fields.weight,
            fields.sprites.front_default,
            fields.sprites.back_default,
            fields.sprites.front_shiny,
            fields.sprites.back_shiny,
            fields.sprites.official_artwork,
            stats.get(StatKind::Hp),
            stats.get(StatKind::Attack),
            stats.get(StatKind::Defense),
            stats.get(StatKind::SpecialAttack),
            stats.get(StatKind::SpecialDefense),
            stats.get(StatKind::Speed),
            now,
        ],
    )?;
    Ok(())
}

fn update_entry(conn: &Connection, fields: &EntryFields, now: &str) -> Result<(), StoreError> {
    let stats = &fields.stats;
    let changed = conn.execute(
        "UPDATE entries SET
             name = ?2,
             height = ?3,
             weight = ?4,
             sprite_front_default = ?5,
             sprite_back_default = ?6,
             sprite_front_shiny = ?7,
             sprite_back_shiny = ?8,
             sprite_official_artwork = ?9,
             hp = COALESCE(?10, hp),
             attack = COALESCE(?11, attack),
             defense = COALESCE(?12, defense),
             special_attack = COALESCE(?13, special_attack),
             special_defense = COALESCE(?14, special_defense),
             speed = COALESCE(?15, speed),
             updated_at = ?16
         WHERE id = ?1",
        params![
            fields.id,
            fields.name,
            fields.height,
            fields.weight,
            fields.sprites.front_default,
            fields.sprites.back_default,
            fields.sprites.front_shiny,
            fields.sprites.back_shiny,
            fields.sprites.official_artwork,
            stats.get(StatKind::Hp),
            stats.get(StatKind::Attack),
            stats.get(StatKind::Defense),
            stats.get(StatKind::SpecialAttack),
            stats.get(StatKind::SpecialDefense),
            stats.get(StatKind::Speed),
            now,
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::entry_not_found(fields.id));
    }
    Ok(())
}

/// Flip an entry's favorite flag. Returns the new value.
pub fn toggle_favorite(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    with_savepoint(conn, "toggle_favorite", |conn| {
        let changed = conn.execute(
            "UPDATE entries SET favorite = NOT favorite, updated_at = ?2 WHERE id = ?1",
            params![id, timestamp()],
        )?;
        if changed == 0 {
            return Err(StoreError::entry_not_found(id));
        }
        let favorite: bool = conn.query_row(
            "SELECT favorite FROM entries WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(favorite)
    })
}

/// Set an entry's favorite flag to an explicit value.
pub fn set_favorite(conn: &Connection, id: i64, favorite: bool) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE entries SET favorite = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, favorite, timestamp()],
    )?;
    if changed == 0 {
        return Err(StoreError::entry_not_found(id));
    }
    Ok(())
}

// ── Tag Operations ──────────────────────────────────────────────────────────

/// Find or create a type tag. An existing tag matches case-insensitively and
/// keeps its stored spelling.
pub fn ensure_type_tag(conn: &Connection, name: &str) -> Result<TypeTag, StoreError> {
    conn.execute(
        "INSERT INTO type_tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    queries::find_type_tag(conn, name)?.ok_or_else(|| StoreError::NotFound {
        entity_type: "type".to_string(),
        id: name.to_string(),
    })
}

/// Find or create an ability tag.
///
/// `is_hidden` is only used when the tag is created; an existing tag keeps
/// the value it was first created with.
pub fn ensure_ability_tag(
    conn: &Connection,
    name: &str,
    is_hidden: bool,
) -> Result<AbilityTag, StoreError> {
    conn.execute(
        "INSERT INTO ability_tags (name, is_hidden) VALUES (?1, ?2)
         ON CONFLICT(name) DO NOTHING",
        params![name, is_hidden],
    )?;
    queries::find_ability_tag(conn, name)?.ok_or_else(|| StoreError::NotFound {
        entity_type: "ability".to_string(),
        id: name.to_string(),
    })
}

// ── Relation Operations ─────────────────────────────────────────────────────

/// Replace an entry's full type and ability relation sets.
///
/// Slots are assigned from sequence order starting at 1. A tag repeated in
/// the same sequence is kept at its first position only. Old relations are
/// removed and new ones added inside one savepoint, so no reader sees a
/// partial set.
pub fn set_relations<S: AsRef<str>>(
    conn: &Connection,
    entry_id: i64,
    type_names: &[S],
    abilities: &[AbilityRef],
) -> Result<(), StoreError> {
    with_savepoint(conn, "set_relations", |conn| {
        if queries::get_entry(conn, entry_id)?.is_none() {
            return Err(StoreError::entry_not_found(entry_id));
        }

        conn.execute(
            "DELETE FROM entry_types WHERE entry_id = ?1",
            params![entry_id],
        )?;
        conn.execute(
            "DELETE FROM entry_abilities WHERE entry_id = ?1",
            params![entry_id],
        )?;

        let mut seen = HashSet::new();
        let mut slot = 0;
        for name in type_names {
            let tag = ensure_type_tag(conn, name.as_ref())?;
            if !seen.insert(tag.id) {
                continue;
            }
            slot += 1;
            conn.execute(
                "INSERT INTO entry_types (entry_id, type_id, slot) VALUES (?1, ?2, ?3)",
                params![entry_id, tag.id, slot],
            )?;
        }

        let mut seen = HashSet::new();
        let mut slot = 0;
        for ability in abilities {
            let tag = ensure_ability_tag(conn, &ability.name, ability.is_hidden)?;
            if !seen.insert(tag.id) {
                continue;
            }
            slot += 1;
            conn.execute(
                "INSERT INTO entry_abilities (entry_id, ability_id, slot) VALUES (?1, ?2, ?3)",
                params![entry_id, tag.id, slot],
            )?;
        }

        Ok(())
    })
}

// ── Import Log Operations ───────────────────────────────────────────────────

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO import_log (source_url, started_at, finished_at,
             references_seen, entries_imported, failures, outcome)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.source_url,
            log.started_at,
            log.finished_at,
            log.references_seen,
            log.entries_imported,
            log.failures,
            log.outcome.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Run `f` inside a named savepoint: released on success, rolled back on
/// error. Savepoints nest, so callers can group several operations that
/// each use one internally.
pub fn with_savepoint<T, E>(
    conn: &Connection,
    name: &str,
    f: impl FnOnce(&Connection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<rusqlite::Error>,
{
    conn.execute_batch(&format!("SAVEPOINT {name}"))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name}"))?;
            Ok(value)
        }
        Err(e) => {
            // The original error wins; a failed rollback is only reported.
            let undo = format!("ROLLBACK TO {name}; RELEASE {name}");
            if let Err(rollback) = conn.execute_batch(&undo) {
                log::warn!("Rollback of savepoint {} failed: {}", name, rollback);
            }
            Err(e)
        }
    }
}

/// Current time as stored in `created_at` / `updated_at` columns.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
