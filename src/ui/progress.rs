use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Spinner shown while the survey file is read
pub struct ProgressReporter {
    loading: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            loading: None,
            enabled,
        }
    }

    pub fn start_loading(&mut self, path: &Path) {
        if !self.enabled {
            return;
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(format!("Reading {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(120));
        self.loading = Some(pb);
    }

    pub fn finish_loading(&mut self, records: usize) {
        if let Some(pb) = self.loading.take() {
            pb.finish_with_message(format!("✓ Loaded {records} record(s)"));
        }
    }

    /// Drop the spinner without a completion message, e.g. after an error
    pub fn abandon(&mut self) {
        if let Some(pb) = self.loading.take() {
            pb.finish_and_clear();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }
}
