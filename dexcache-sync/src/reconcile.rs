//! Merge one upstream payload into the store.
//!
//! Upstream owns every field except `favorite`. Reconciling a payload
//! replaces the upstream-owned fields and the full type/ability relation
//! sets of that entry, creates missing tags, and leaves `favorite` alone.
//! Reconciling the same payload twice yields the same stored state apart
//! from `updated_at`.

use std::collections::HashSet;

use dexcache_catalog::types::*;
use dexcache_db::{StoreError, operations};
use dexcache_upstream::RawPayload;
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Database error: {0}")]
    Db(#[from] StoreError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// What a reconciliation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created(i64),
    Updated(i64),
}

impl ReconcileOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }
}

/// A payload mapped onto store inputs, before any tag is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedEntry {
    pub fields: EntryFields,
    /// Type names in payload order, first occurrence wins.
    pub type_names: Vec<String>,
    /// Abilities in payload order with normalized names, first occurrence wins.
    pub abilities: Vec<AbilityRef>,
}

/// Ability names are stored with hyphens replaced by spaces.
pub fn normalize_ability_name(name: &str) -> String {
    name.replace('-', " ")
}

/// Map a payload onto entry fields and ordered relation inputs.
///
/// Missing sprites become `None`. Stats with unknown names are ignored;
/// known stats absent from the payload stay unset so the store keeps its
/// current value.
pub fn map_payload(payload: &RawPayload) -> MappedEntry {
    let sprites = Sprites {
        front_default: payload.sprites.front_default.clone(),
        back_default: payload.sprites.back_default.clone(),
        front_shiny: payload.sprites.front_shiny.clone(),
        back_shiny: payload.sprites.back_shiny.clone(),
        official_artwork: payload.sprites.official_artwork().map(str::to_string),
    };

    let mut stats = StatUpdate::default();
    for stat in &payload.stats {
        match StatKind::from_upstream(&stat.stat.name) {
            Some(kind) => stats.set(kind, stat.base_stat),
            None => log::debug!("Ignoring unknown stat '{}' on #{}", stat.stat.name, payload.id),
        }
    }

    let mut seen = HashSet::new();
    let type_names = payload
        .types
        .iter()
        .map(|t| t.type_ref.name.clone())
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect();

    let mut seen = HashSet::new();
    let abilities = payload
        .abilities
        .iter()
        .map(|a| AbilityRef {
            name: normalize_ability_name(&a.ability.name),
            is_hidden: a.is_hidden,
        })
        .filter(|a| seen.insert(a.name.clone()))
        .collect();

    MappedEntry {
        fields: EntryFields {
            id: payload.id,
            name: payload.name.clone(),
            height: payload.height,
            weight: payload.weight,
            sprites,
            stats,
        },
        type_names,
        abilities,
    }
}

/// Merge one payload into the store as a single all-or-nothing step.
///
/// Tags are resolved before relations are replaced: a type keeps the
/// spelling it was first stored with, and an existing ability keeps its
/// stored `is_hidden` regardless of what this payload claims.
pub fn reconcile_entry(
    conn: &Connection,
    payload: &RawPayload,
) -> Result<ReconcileOutcome, ReconcileError> {
    let mapped = map_payload(payload);

    operations::with_savepoint(conn, "reconcile_entry", |conn| -> Result<_, ReconcileError> {
        let upserted = operations::upsert_entry(conn, &mapped.fields)?;
        let id = upserted.entry.id;

        let mut type_names = Vec::with_capacity(mapped.type_names.len());
        for name in &mapped.type_names {
            let tag = operations::ensure_type_tag(conn, name)?;
            type_names.push(tag.name);
        }

        let mut abilities = Vec::with_capacity(mapped.abilities.len());
        for ability in &mapped.abilities {
            let tag = operations::ensure_ability_tag(conn, &ability.name, ability.is_hidden)?;
            if tag.is_hidden != ability.is_hidden {
                log::debug!(
                    "Ability '{}' on #{} keeps stored is_hidden={}",
                    tag.name,
                    id,
                    tag.is_hidden
                );
            }
            abilities.push(AbilityRef {
                name: tag.name,
                is_hidden: tag.is_hidden,
            });
        }

        operations::set_relations(conn, id, &type_names, &abilities)?;

        log::debug!(
            "Reconciled #{} {} ({} types, {} abilities)",
            id,
            upserted.entry.name,
            type_names.len(),
            abilities.len()
        );

        Ok(if upserted.created {
            ReconcileOutcome::Created(id)
        } else {
            ReconcileOutcome::Updated(id)
        })
    })
}
