use serde::{Deserialize, Deserializer};

use crate::error::UpstreamError;

/// Full entry payload from the detail endpoint.
///
/// Only the keys reconciliation needs are modelled. `id`, `name`, `height`,
/// `weight`, `types`, `abilities` and `stats` are required; `sprites` may be
/// missing or partial.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPayload {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sprites: SpritePayload,
    pub types: Vec<TypeSlotPayload>,
    pub abilities: Vec<AbilitySlotPayload>,
    pub stats: Vec<StatPayload>,
}

impl RawPayload {
    /// Parse and minimally validate a detail response body.
    pub fn parse(body: &str) -> Result<Self, UpstreamError> {
        serde_json::from_str(body).map_err(|e| {
            UpstreamError::Malformed(format!(
                "{e}. Response: {}",
                &body[..floor_char_boundary(body, 200)]
            ))
        })
    }
}

/// Treat an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `{name, url}` reference as upstream nests them everywhere.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlotPayload {
    #[serde(default)]
    pub slot: Option<i64>,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlotPayload {
    pub ability: NamedResource,
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatPayload {
    pub base_stat: i64,
    #[serde(default)]
    pub effort: i64,
    pub stat: NamedResource,
}

/// Sprite URL map. Upstream sends many more keys; unknown ones are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpritePayload {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub back_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSpritePayload>,
}

impl SpritePayload {
    /// The official artwork URL, if upstream provided one.
    pub fn official_artwork(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSpritePayload {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkPayload {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Listing response from the paginated endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPayload {
    /// Total number of entries upstream.
    #[serde(default)]
    pub count: Option<u64>,
    /// URL of the following page, absent on the last one.
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A reference to one entry, taken from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    pub id: i64,
    pub name: String,
    pub detail_url: String,
}

impl ListingPayload {
    /// Parse a listing response body.
    pub fn parse(body: &str) -> Result<Self, UpstreamError> {
        serde_json::from_str(body).map_err(|e| {
            UpstreamError::Malformed(format!(
                "{e}. Response: {}",
                &body[..floor_char_boundary(body, 200)]
            ))
        })
    }

    /// Whether upstream has references past this page.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Convert listing results into entry references, preserving order.
    ///
    /// Each result must carry a detail URL ending in a numeric id.
    pub fn into_refs(self) -> Result<Vec<EntryRef>, UpstreamError> {
        self.results
            .into_iter()
            .map(|r| {
                let url = r.url.ok_or_else(|| {
                    UpstreamError::Malformed(format!("listing result '{}' has no url", r.name))
                })?;
                let id = entry_id_from_url(&url).ok_or_else(|| {
                    UpstreamError::Malformed(format!("no entry id in listing url '{url}'"))
                })?;
                Ok(EntryRef {
                    id,
                    name: r.name,
                    detail_url: url,
                })
            })
            .collect()
    }
}

/// Extract the trailing numeric path segment from a detail URL
/// (`.../pokemon/25/` yields 25).
pub fn entry_id_from_url(url: &str) -> Option<i64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}
