//! Bootstrap progress reporting.

use dexcache_upstream::UpstreamError;

use crate::bootstrap::BootstrapReport;

/// Receives progress updates while a bootstrap run imports entries.
pub trait BootstrapProgress {
    /// Called when a phase starts (e.g., "Fetching reference page").
    fn on_phase(&self, message: &str);

    /// Called after each entry is reconciled.
    fn on_entry(&self, current: usize, total: usize, name: &str);

    /// Called when fetching an entry fails.
    fn on_failure(&self, current: usize, total: usize, name: &str, error: &UpstreamError);

    /// Called once the run has finished, successfully or not.
    fn on_complete(&self, report: &BootstrapReport);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl BootstrapProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_entry(&self, _current: usize, _total: usize, _name: &str) {}
    fn on_failure(&self, _current: usize, _total: usize, _name: &str, _error: &UpstreamError) {}
    fn on_complete(&self, _report: &BootstrapReport) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl BootstrapProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_entry(&self, current: usize, total: usize, name: &str) {
        if current.is_multiple_of(20) || current == total {
            log::info!("  [{}/{}] {}", current, total, name);
        }
    }

    fn on_failure(&self, current: usize, total: usize, name: &str, error: &UpstreamError) {
        log::warn!("  [{}/{}] {} failed: {}", current, total, name, error);
    }

    fn on_complete(&self, report: &BootstrapReport) {
        log::info!("{}", report.summary());
    }
}
