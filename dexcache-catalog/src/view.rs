//! Serialized output shapes.
//!
//! The detail shape mirrors the upstream schema (slots, nested `type` /
//! `ability` / `stat` objects, nested official artwork) so consumers written
//! against upstream can read cached entries unchanged.

use serde::Serialize;

use crate::types::{EntryRecord, Sprites, StatKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSlot {
    pub slot: usize,
    #[serde(rename = "type")]
    pub type_ref: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilitySlot {
    pub ability: NamedRef,
    pub is_hidden: bool,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatValue {
    pub base_stat: i64,
    /// Effort values are not stored; always 0.
    pub effort: i64,
    pub stat: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Artwork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
    pub other: OtherSprites,
}

impl From<&Sprites> for SpriteSet {
    fn from(s: &Sprites) -> Self {
        Self {
            front_default: s.front_default.clone(),
            back_default: s.back_default.clone(),
            front_shiny: s.front_shiny.clone(),
            back_shiny: s.back_shiny.clone(),
            other: OtherSprites {
                official_artwork: Artwork {
                    front_default: s.official_artwork.clone(),
                },
            },
        }
    }
}

/// Full single-entry shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub sprites: SpriteSet,
    pub stats: Vec<StatValue>,
    pub favorite: bool,
}

impl From<&EntryRecord> for EntryDetail {
    fn from(record: &EntryRecord) -> Self {
        let entry = &record.entry;
        Self {
            id: entry.id,
            name: entry.name.clone(),
            height: entry.height,
            weight: entry.weight,
            types: record
                .types
                .iter()
                .enumerate()
                .map(|(i, t)| TypeSlot {
                    slot: i + 1,
                    type_ref: NamedRef {
                        name: t.name.clone(),
                    },
                })
                .collect(),
            abilities: record
                .abilities
                .iter()
                .enumerate()
                .map(|(i, a)| AbilitySlot {
                    ability: NamedRef {
                        name: a.name.clone(),
                    },
                    is_hidden: a.is_hidden,
                    slot: i + 1,
                })
                .collect(),
            sprites: SpriteSet::from(&entry.sprites),
            stats: StatKind::ALL
                .into_iter()
                .map(|kind| StatValue {
                    base_stat: entry.stats.get(kind),
                    effort: 0,
                    stat: NamedRef {
                        name: kind.as_str().to_string(),
                    },
                })
                .collect(),
            favorite: entry.favorite,
        }
    }
}

/// Listing shape: identity, types, sprites and the favorite flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub id: i64,
    pub name: String,
    pub types: Vec<NamedRef>,
    pub sprites: SpriteSet,
    pub favorite: bool,
}

impl From<&EntryRecord> for EntrySummary {
    fn from(record: &EntryRecord) -> Self {
        Self {
            id: record.entry.id,
            name: record.entry.name.clone(),
            types: record
                .types
                .iter()
                .map(|t| NamedRef {
                    name: t.name.clone(),
                })
                .collect(),
            sprites: SpriteSet::from(&record.entry.sprites),
            favorite: record.entry.favorite,
        }
    }
}

/// Result of a favorite toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteState {
    pub id: i64,
    pub name: String,
    pub favorite: bool,
}

impl From<&EntryRecord> for FavoriteState {
    fn from(record: &EntryRecord) -> Self {
        Self {
            id: record.entry.id,
            name: record.entry.name.clone(),
            favorite: record.entry.favorite,
        }
    }
}
