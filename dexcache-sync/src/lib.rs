//! Keeps the local catalog in step with upstream.
//!
//! This crate owns the read-through logic: merging upstream payloads into
//! the store without touching locally owned fields, bulk-importing into an
//! empty store, and answering listing and lookup requests with an upstream
//! fallback on miss.

pub mod bootstrap;
pub mod progress;
pub mod reconcile;
pub mod service;
pub mod settings;

pub use bootstrap::{
    BootstrapError, BootstrapOptions, BootstrapReport, FailurePolicy, run_bootstrap,
};
pub use progress::{BootstrapProgress, LogProgress, SilentProgress};
pub use reconcile::{
    MappedEntry, ReconcileError, ReconcileOutcome, map_payload, normalize_ability_name,
    reconcile_entry,
};
pub use service::{ListQuery, Paginated, QueryError, QueryService, ServiceOptions};
pub use settings::{
    SettingSource, Settings, SettingsError, check_base_url, check_positive, config_path,
    settings_sources,
};
