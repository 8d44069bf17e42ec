use std::future::Future;

use crate::error::UpstreamError;
use crate::types::{EntryRef, RawPayload};

/// Anything that can answer entry and listing requests the way the upstream
/// API does. Implemented by [`crate::UpstreamClient`]; tests provide
/// in-process fakes.
pub trait CatalogSource {
    /// Base location of the source, recorded in import logs.
    fn source_url(&self) -> &str;

    /// Fetch the full payload for one entry id.
    fn fetch_entry(&self, id: i64) -> impl Future<Output = Result<RawPayload, UpstreamError>>;

    /// Fetch one page of entry references, in upstream order.
    fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EntryRef>, UpstreamError>>;

    /// Fetch the full payload behind a detail URL taken from a listing page.
    fn fetch_by_url(
        &self,
        detail_url: &str,
    ) -> impl Future<Output = Result<RawPayload, UpstreamError>>;
}
