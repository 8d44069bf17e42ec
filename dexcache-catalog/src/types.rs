//! Data model types for the creature catalog.
//!
//! These types represent the persistent schema: entries, type tags, ability
//! tags, the ordered relations between them, and bootstrap tracking.

use serde::{Deserialize, Serialize};

// ── Stats ───────────────────────────────────────────────────────────────────

/// One of the six base stats an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    /// All stats, in the order they are reported.
    pub const ALL: [StatKind; 6] = [
        Self::Hp,
        Self::Attack,
        Self::Defense,
        Self::SpecialAttack,
        Self::SpecialDefense,
        Self::Speed,
    ];

    /// The stat name as the upstream API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpecialAttack => "special-attack",
            Self::SpecialDefense => "special-defense",
            Self::Speed => "speed",
        }
    }

    /// Map an upstream stat name to a known stat. Unknown names yield `None`.
    pub fn from_upstream(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored base stats. Stats never reported by upstream stay at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub special_attack: i64,
    pub special_defense: i64,
    pub speed: i64,
}

impl BaseStats {
    pub fn get(&self, kind: StatKind) -> i64 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpecialAttack => self.special_attack,
            StatKind::SpecialDefense => self.special_defense,
            StatKind::Speed => self.speed,
        }
    }
}

/// A partial stat write: only the stats present in a payload are set.
///
/// Absent stats keep whatever the store already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatUpdate {
    values: [Option<i64>; 6],
}

impl StatUpdate {
    pub fn set(&mut self, kind: StatKind, value: i64) {
        self.values[Self::index(kind)] = Some(value);
    }

    pub fn get(&self, kind: StatKind) -> Option<i64> {
        self.values[Self::index(kind)]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    fn index(kind: StatKind) -> usize {
        match kind {
            StatKind::Hp => 0,
            StatKind::Attack => 1,
            StatKind::Defense => 2,
            StatKind::SpecialAttack => 3,
            StatKind::SpecialDefense => 4,
            StatKind::Speed => 5,
        }
    }
}

// ── Sprites ─────────────────────────────────────────────────────────────────

/// The five sprite URLs kept per entry. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
    pub official_artwork: Option<String>,
}

// ── Entry ───────────────────────────────────────────────────────────────────

/// A stored catalog entry. The id is assigned by upstream and never
/// regenerated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub stats: BaseStats,
    pub sprites: Sprites,
    /// Locally owned. Reconciliation never writes it.
    pub favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// The upstream-owned fields written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub sprites: Sprites,
    pub stats: StatUpdate,
}

// ── Tags ────────────────────────────────────────────────────────────────────

/// A type tag ("fire", "water"). Unique by name, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTag {
    pub id: i64,
    pub name: String,
}

/// An ability tag. Unique by normalized name; `is_hidden` is fixed by the
/// first entry that introduced the ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityTag {
    pub id: i64,
    pub name: String,
    pub is_hidden: bool,
}

/// An ability reference as extracted from a payload, before it is resolved
/// to a stored tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityRef {
    pub name: String,
    pub is_hidden: bool,
}

// ── Entry Record ────────────────────────────────────────────────────────────

/// An entry together with its relations, each list in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub entry: Entry,
    pub types: Vec<TypeTag>,
    pub abilities: Vec<AbilityTag>,
}

impl EntryRecord {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// How a bootstrap run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Every listed reference was imported.
    Complete,
    /// Some references failed and were skipped.
    Partial,
    /// A per-entry failure stopped the remaining imports.
    Aborted,
    /// The reference page itself could not be fetched.
    PageFailed,
}

impl ImportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Aborted => "aborted",
            Self::PageFailed => "page_failed",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "partial" => Self::Partial,
            "aborted" => Self::Aborted,
            "page_failed" => Self::PageFailed,
            _ => Self::Complete,
        }
    }
}

/// Log entry for one bootstrap run.
#[derive(Debug, Clone)]
pub struct ImportLog {
    pub id: i64,
    pub source_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub references_seen: i64,
    pub entries_imported: i64,
    pub failures: i64,
    pub outcome: ImportOutcome,
}
