//! Progress reporting for the insert loop
//!
//! Thin wrapper over `indicatif`; hidden when progress display is off so the
//! engine never branches on it.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for row-by-row insertion
pub struct InsertProgress {
    bar: ProgressBar,
}

impl InsertProgress {
    /// Create a reporter for `total_records` rows.
    ///
    /// When `visible` is false the bar is hidden and every update is a no-op.
    pub fn new(total_records: u64, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(total_records);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} records ({eta})"
                )
                .unwrap()
                .progress_chars("█▓▒░  ")
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar }
    }

    /// Advance by one row
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Set a status message
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Finish with a success message
    pub fn finish_success(&self, msg: &str) {
        self.bar.finish_with_message(format!("✓ {}", msg));
    }

    /// Finish with an error message
    pub fn finish_error(&self, msg: &str) {
        self.bar.abandon_with_message(format!("✗ {}", msg));
    }
}
