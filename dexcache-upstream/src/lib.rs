//! Client for the upstream creature catalog API.
//!
//! Fetches single entries and pages of entry references, validates payloads
//! just enough to hand them to reconciliation, and reports failures as typed
//! outcomes (unavailable, not found, malformed).

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::{ClientOptions, DEFAULT_BASE_URL, UpstreamClient};
pub use error::UpstreamError;
pub use source::CatalogSource;
pub use types::{EntryRef, RawPayload};
