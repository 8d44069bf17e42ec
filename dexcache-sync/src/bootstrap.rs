//! Populate an empty store from upstream in one bulk run.
//!
//! A run fetches one reference page, then fetches each referenced entry
//! and reconciles it. Detail fetches run concurrently but results are
//! consumed in reference order, and every store write happens on the
//! calling task, so reconciliations never interleave.

use std::fmt;
use std::str::FromStr;

use dexcache_catalog::types::*;
use dexcache_db::{StoreError, operations};
use dexcache_upstream::{CatalogSource, EntryRef};
use futures::stream::{self, StreamExt};
use rusqlite::Connection;
use thiserror::Error;

use crate::progress::BootstrapProgress;
use crate::reconcile::{self, ReconcileError, ReconcileOutcome};

pub const DEFAULT_LIMIT: u32 = 60;
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),
    #[error("Database error: {0}")]
    Db(#[from] StoreError),
}

/// What to do when fetching one referenced entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; entries already reconciled stay.
    #[default]
    AbortRemaining,
    /// Count the failure and move on to the next reference.
    SkipAndContinue,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbortRemaining => "abort",
            Self::SkipAndContinue => "skip",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "abort-remaining" => Ok(Self::AbortRemaining),
            "skip" | "skip-and-continue" => Ok(Self::SkipAndContinue),
            other => Err(format!("unknown failure policy '{other}' (expected abort or skip)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Number of references requested from the listing endpoint.
    pub limit: u32,
    /// Maximum number of detail fetches in flight at once.
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Summary of one bootstrap run.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    pub references_seen: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Set when a failure stopped the remaining imports.
    pub aborted: bool,
    /// Set when the reference page could not be fetched.
    pub page_error: Option<String>,
}

impl BootstrapReport {
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }

    pub fn outcome(&self) -> ImportOutcome {
        if self.page_error.is_some() {
            ImportOutcome::PageFailed
        } else if self.aborted {
            ImportOutcome::Aborted
        } else if self.failed > 0 {
            ImportOutcome::Partial
        } else {
            ImportOutcome::Complete
        }
    }

    pub fn summary(&self) -> String {
        match (&self.page_error, self.outcome()) {
            (Some(err), _) => format!("Bootstrap skipped: reference page unavailable ({err})"),
            (None, ImportOutcome::Aborted) => format!(
                "Bootstrap aborted: {} of {} imported before the first failure",
                self.imported(),
                self.references_seen
            ),
            _ => format!(
                "Bootstrap complete: {} imported ({} new, {} updated), {} failed",
                self.imported(),
                self.created,
                self.updated,
                self.failed
            ),
        }
    }
}

/// Fetch the first `options.limit` references and reconcile each entry.
///
/// Upstream failures never surface as errors: a failed reference page ends
/// the run with nothing imported, and a failed entry is handled per
/// `options.failure_policy`. Store errors propagate. Every run, including
/// one whose page fetch failed, is recorded in the import log.
pub async fn run_bootstrap<S: CatalogSource>(
    conn: &Connection,
    source: &S,
    options: &BootstrapOptions,
    progress: &dyn BootstrapProgress,
) -> Result<BootstrapReport, BootstrapError> {
    let started_at = operations::timestamp();
    let mut report = BootstrapReport::default();

    progress.on_phase(&format!(
        "Fetching {} references from {}",
        options.limit,
        source.source_url()
    ));

    let refs = match source.fetch_page(0, options.limit).await {
        Ok(refs) => refs,
        Err(e) => {
            log::warn!("Reference page unavailable, nothing imported: {}", e);
            report.page_error = Some(e.to_string());
            record_run(conn, source, &report, &started_at)?;
            progress.on_complete(&report);
            return Ok(report);
        }
    };

    report.references_seen = refs.len();
    let total = refs.len();
    progress.on_phase(&format!("Importing {} entries", total));

    let mut fetches = stream::iter(refs)
        .map(|entry_ref: EntryRef| async move {
            let result = source.fetch_by_url(&entry_ref.detail_url).await;
            (entry_ref, result)
        })
        .buffered(options.concurrency.max(1));

    let mut current = 0;
    while let Some((entry_ref, result)) = fetches.next().await {
        current += 1;
        match result {
            Ok(payload) => {
                match reconcile::reconcile_entry(conn, &payload)? {
                    ReconcileOutcome::Created(_) => report.created += 1,
                    ReconcileOutcome::Updated(_) => report.updated += 1,
                }
                progress.on_entry(current, total, &payload.name);
            }
            Err(e) => {
                report.failed += 1;
                progress.on_failure(current, total, &entry_ref.name, &e);
                if options.failure_policy == FailurePolicy::AbortRemaining {
                    log::warn!(
                        "Stopping bootstrap after {} failed: {} ({} remaining skipped)",
                        entry_ref.name,
                        e,
                        total - current
                    );
                    report.aborted = true;
                    break;
                }
            }
        }
    }
    drop(fetches);

    record_run(conn, source, &report, &started_at)?;
    progress.on_complete(&report);
    Ok(report)
}

fn record_run<S: CatalogSource>(
    conn: &Connection,
    source: &S,
    report: &BootstrapReport,
    started_at: &str,
) -> Result<i64, StoreError> {
    operations::insert_import_log(
        conn,
        &ImportLog {
            id: 0,
            source_url: source.source_url().to_string(),
            started_at: started_at.to_string(),
            finished_at: operations::timestamp(),
            references_seen: report.references_seen as i64,
            entries_imported: report.imported() as i64,
            failures: report.failed as i64,
            outcome: report.outcome(),
        },
    )
}
