//! Progress bar for bootstrap runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use dexcache_sync::{BootstrapProgress, BootstrapReport};
use dexcache_upstream::UpstreamError;

/// Draws bootstrap progress on stderr. Hidden when `quiet` is set.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        Self { pb }
    }
}

impl BootstrapProgress for BarProgress {
    fn on_phase(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn on_entry(&self, current: usize, total: usize, name: &str) {
        if self.pb.length() != Some(total as u64) {
            self.pb.set_length(total as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "  [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            ) {
                self.pb.set_style(style.progress_chars("=> "));
            }
        }
        self.pb.set_position(current as u64);
        self.pb.set_message(name.to_string());
    }

    fn on_failure(&self, current: usize, total: usize, name: &str, error: &UpstreamError) {
        self.pb.set_position(current as u64);
        self.pb.suspend(|| {
            log::warn!(
                "  [{}/{}] {} {}",
                current,
                total,
                name.if_supports_color(Stderr, |t| t.yellow()),
                error,
            );
        });
    }

    fn on_complete(&self, report: &BootstrapReport) {
        self.pb.finish_and_clear();
        log::debug!("{}", report.summary());
    }
}
