//! Read-through query service.
//!
//! Every read goes to the store first. An empty store triggers one
//! bootstrap before a listing is answered, and a single-entry miss falls
//! back to upstream and reconciles the result before re-reading it.

use dexcache_catalog::types::*;
use dexcache_db::{ListFilter, StoreError, operations, queries};
use dexcache_upstream::CatalogSource;
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::bootstrap::{self, BootstrapError, BootstrapOptions, BootstrapReport};
use crate::progress::{BootstrapProgress, LogProgress};
use crate::reconcile::{self, ReconcileError};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Entry {0} not found")]
    EntryNotFound(i64),
    #[error("Invalid page {0}")]
    InvalidPage(u32),
    #[error("Database error: {0}")]
    Store(#[from] StoreError),
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),
}

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub bootstrap: BootstrapOptions,
    /// Page size used when a query does not name one.
    pub page_size: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            bootstrap: BootstrapOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A listing request. Pages are numbered from 1.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Case-insensitive substring of the entry name.
    pub name: Option<String>,
    /// Case-insensitive exact type name.
    pub type_name: Option<String>,
    pub favorites_only: bool,
    pub page: u32,
    pub page_size: Option<u32>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            name: None,
            type_name: None,
            favorites_only: false,
            page: 1,
            page_size: None,
        }
    }
}

impl ListQuery {
    fn filter(&self) -> ListFilter {
        ListFilter {
            name_contains: self.name.clone(),
            type_equals: self.type_name.clone(),
            favorites_only: self.favorites_only,
        }
    }
}

/// One page of results plus the totals needed to navigate.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub num_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    fn new(count: u64, page: u32, page_size: u32, num_pages: u32, results: Vec<T>) -> Self {
        Self {
            count,
            page,
            page_size,
            num_pages,
            has_next: page < num_pages,
            has_previous: page > 1,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Answers catalog reads against the store, filling it from `source`.
///
/// All store access goes through the one connection on the calling task,
/// so at most one reconciliation for a given id is ever in flight.
pub struct QueryService<'a, S: CatalogSource> {
    conn: &'a Connection,
    source: &'a S,
    options: ServiceOptions,
    progress: &'a dyn BootstrapProgress,
}

impl<'a, S: CatalogSource> QueryService<'a, S> {
    pub fn new(conn: &'a Connection, source: &'a S, options: ServiceOptions) -> Self {
        Self {
            conn,
            source,
            options,
            progress: &LogProgress,
        }
    }

    /// Report bootstrap progress somewhere other than the log.
    pub fn with_progress(mut self, progress: &'a dyn BootstrapProgress) -> Self {
        self.progress = progress;
        self
    }

    /// List entries matching `query`, bootstrapping first if the store is empty.
    pub async fn list_entries(
        &self,
        query: &ListQuery,
    ) -> Result<Paginated<EntryRecord>, QueryError> {
        self.ensure_bootstrapped().await?;
        self.paginate(&query.filter(), query.page, query.page_size)
    }

    /// List favorite entries. Never triggers a bootstrap.
    pub fn list_favorites(
        &self,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<Paginated<EntryRecord>, QueryError> {
        let filter = ListFilter {
            favorites_only: true,
            ..Default::default()
        };
        self.paginate(&filter, page, page_size)
    }

    /// Look up one entry, fetching it from upstream on a store miss.
    ///
    /// Any upstream failure on the fallback path is reported as
    /// `EntryNotFound`.
    pub async fn get_entry(&self, id: i64) -> Result<EntryRecord, QueryError> {
        if let Some(record) = queries::get_entry_record(self.conn, id)? {
            return Ok(record);
        }
        let stored_id = self
            .fetch_missing(id)
            .await?
            .ok_or(QueryError::EntryNotFound(id))?;
        queries::get_entry_record(self.conn, stored_id)?.ok_or(QueryError::EntryNotFound(id))
    }

    /// Flip the favorite flag of an entry.
    ///
    /// An entry missing from the store is fetched from upstream and stored
    /// as a favorite, since toggling its implicit `false` yields `true`.
    pub async fn toggle_favorite(&self, id: i64) -> Result<EntryRecord, QueryError> {
        let stored_id = match queries::get_entry(self.conn, id)? {
            Some(entry) => {
                operations::toggle_favorite(self.conn, entry.id)?;
                entry.id
            }
            None => {
                let stored_id = self
                    .fetch_missing(id)
                    .await?
                    .ok_or(QueryError::EntryNotFound(id))?;
                operations::set_favorite(self.conn, stored_id, true)?;
                stored_id
            }
        };
        queries::get_entry_record(self.conn, stored_id)?.ok_or(QueryError::EntryNotFound(id))
    }

    /// Distinct type names, sorted ascending.
    pub fn list_type_names(&self) -> Result<Vec<String>, QueryError> {
        Ok(queries::list_type_names(self.conn)?)
    }

    /// Run a bootstrap regardless of whether the store is empty.
    pub async fn bootstrap(&self) -> Result<BootstrapReport, QueryError> {
        Ok(bootstrap::run_bootstrap(
            self.conn,
            self.source,
            &self.options.bootstrap,
            self.progress,
        )
        .await?)
    }

    async fn ensure_bootstrapped(&self) -> Result<(), QueryError> {
        if !queries::entries_exist(self.conn)? {
            log::info!("Store is empty, bootstrapping from {}", self.source.source_url());
            self.bootstrap().await?;
        }
        Ok(())
    }

    /// Fetch and reconcile one entry. Returns the stored id, or `None`
    /// when upstream could not supply it.
    async fn fetch_missing(&self, id: i64) -> Result<Option<i64>, QueryError> {
        let payload = match self.source.fetch_entry(id).await {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("Upstream lookup for #{} failed ({}): {}", id, e.kind(), e);
                return Ok(None);
            }
        };
        let outcome = reconcile::reconcile_entry(self.conn, &payload)?;
        Ok(Some(outcome.id()))
    }

    fn paginate(
        &self,
        filter: &ListFilter,
        page: u32,
        page_size: Option<u32>,
    ) -> Result<Paginated<EntryRecord>, QueryError> {
        let page_size = page_size.unwrap_or(self.options.page_size).max(1);
        if page == 0 {
            return Err(QueryError::InvalidPage(page));
        }

        let count = queries::count_entries(self.conn, filter)?;
        let num_pages = count.div_ceil(u64::from(page_size)).max(1);
        if u64::from(page) > num_pages {
            return Err(QueryError::InvalidPage(page));
        }

        let offset = u64::from(page - 1) * u64::from(page_size);
        let results = queries::list_entries(self.conn, filter, offset, u64::from(page_size))?;

        Ok(Paginated::new(
            count,
            page,
            page_size,
            u32::try_from(num_pages).unwrap_or(u32::MAX),
            results,
        ))
    }
}
