//! Creature catalog data model and its upstream-compatible output shapes.
//!
//! This crate defines the persisted entities (entries, type tags, ability
//! tags) without any database or network dependencies. `dexcache-db` stores
//! them, `dexcache-sync` fills them from upstream payloads.

pub mod types;
pub mod view;

pub use types::*;
pub use view::{EntryDetail, EntrySummary, FavoriteState};
