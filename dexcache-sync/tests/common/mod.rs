#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use dexcache_upstream::types::entry_id_from_url;
use dexcache_upstream::{CatalogSource, EntryRef, RawPayload, UpstreamError};

pub const SOURCE_URL: &str = "https://upstream.test/api/v2";

/// In-memory upstream that records every call it receives.
#[derive(Default)]
pub struct FakeSource {
    payloads: HashMap<i64, String>,
    listing: Vec<(i64, String)>,
    failing: HashSet<i64>,
    page_down: bool,
    calls: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for entry `id` and list it on the reference page.
    pub fn with_entry(mut self, id: i64, name: &str, body: String) -> Self {
        self.payloads.insert(id, body);
        self.listing.push((id, name.to_string()));
        self
    }

    /// List entry `id` but fail every fetch of it.
    pub fn with_failing(mut self, id: i64, name: &str) -> Self {
        self.failing.insert(id);
        self.listing.push((id, name.to_string()));
        self
    }

    pub fn with_page_down(mut self) -> Self {
        self.page_down = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn detail(&self, id: i64) -> Result<RawPayload, UpstreamError> {
        if self.failing.contains(&id) {
            return Err(UpstreamError::Unavailable(format!("entry {id} timed out")));
        }
        match self.payloads.get(&id) {
            Some(body) => RawPayload::parse(body),
            None => Err(UpstreamError::NotFound(format!("{SOURCE_URL}/pokemon/{id}"))),
        }
    }
}

impl CatalogSource for FakeSource {
    fn source_url(&self) -> &str {
        SOURCE_URL
    }

    async fn fetch_entry(&self, id: i64) -> Result<RawPayload, UpstreamError> {
        self.calls.borrow_mut().push(format!("entry {id}"));
        self.detail(id)
    }

    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<EntryRef>, UpstreamError> {
        self.calls
            .borrow_mut()
            .push(format!("page {offset}+{limit}"));
        if self.page_down {
            return Err(UpstreamError::Unavailable("listing returned HTTP 503".to_string()));
        }
        Ok(self
            .listing
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(id, name)| EntryRef {
                id: *id,
                name: name.clone(),
                detail_url: format!("{SOURCE_URL}/pokemon/{id}/"),
            })
            .collect())
    }

    async fn fetch_by_url(&self, detail_url: &str) -> Result<RawPayload, UpstreamError> {
        self.calls.borrow_mut().push(format!("url {detail_url}"));
        let id = entry_id_from_url(detail_url)
            .ok_or_else(|| UpstreamError::Malformed(detail_url.to_string()))?;
        self.detail(id)
    }
}

/// Build a detail payload body in the upstream shape.
pub fn payload(
    id: i64,
    name: &str,
    types: &[&str],
    abilities: &[(&str, bool)],
    stats: &[(&str, i64)],
) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "back_default": null,
            "other": {"official-artwork": {"front_default": format!("https://img.test/art/{id}.png")}}
        },
        "types": types.iter().enumerate().map(|(i, t)| serde_json::json!({
            "slot": i + 1, "type": {"name": t, "url": format!("{SOURCE_URL}/type/{t}/")}
        })).collect::<Vec<_>>(),
        "abilities": abilities.iter().enumerate().map(|(i, (a, hidden))| serde_json::json!({
            "ability": {"name": a}, "is_hidden": hidden, "slot": i + 1
        })).collect::<Vec<_>>(),
        "stats": stats.iter().map(|(s, v)| serde_json::json!({
            "base_stat": v, "effort": 0, "stat": {"name": s}
        })).collect::<Vec<_>>(),
    })
    .to_string()
}

pub fn parse(body: &str) -> RawPayload {
    RawPayload::parse(body).unwrap()
}

pub fn bulbasaur() -> String {
    payload(
        1,
        "bulbasaur",
        &["grass", "poison"],
        &[("overgrow", false), ("chlorophyll", true)],
        &[
            ("hp", 45),
            ("attack", 49),
            ("defense", 49),
            ("special-attack", 65),
            ("special-defense", 65),
            ("speed", 45),
        ],
    )
}

pub fn charmander() -> String {
    payload(
        4,
        "charmander",
        &["fire"],
        &[("blaze", false), ("solar-power", true)],
        &[("hp", 39), ("speed", 65)],
    )
}

pub fn squirtle() -> String {
    payload(
        7,
        "squirtle",
        &["water"],
        &[("torrent", false), ("rain-dish", true)],
        &[("hp", 44)],
    )
}

/// A source listing bulbasaur, charmander and squirtle.
pub fn starter_source() -> FakeSource {
    FakeSource::new()
        .with_entry(1, "bulbasaur", bulbasaur())
        .with_entry(4, "charmander", charmander())
        .with_entry(7, "squirtle", squirtle())
}
