//! Stage progress display for collection generation

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
});

/// Coordinates one progress bar per generation stage
///
/// Stages are shown one after another; finishing a stage leaves its bar on
/// screen with a completion message.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    stage_bar: Option<ProgressBar>,
    completed_stages: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            stage_bar: None,
            completed_stages: 0,
        }
    }

    /// Begin a stage of `total` steps, finishing any stage still running
    pub fn start_stage(&mut self, label: &str, total: usize) {
        self.finish_stage();

        let bar = ProgressBar::new(total as u64);
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(label.to_string());
        self.stage_bar = Some(self.multi_progress.add(bar));
    }

    /// Advance the current stage by one step
    pub fn advance(&self, message: &str) {
        if let Some(ref bar) = self.stage_bar {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    /// Mark the current stage as complete
    pub fn finish_stage(&mut self) {
        if let Some(bar) = self.stage_bar.take() {
            bar.finish_with_message("Complete");
            self.completed_stages += 1;
        }
    }

    /// Number of stages finished so far
    pub const fn completed_stages(&self) -> usize {
        self.completed_stages
    }

    /// Finish the current stage and release the display
    pub fn finish(&mut self) {
        self.finish_stage();
        let _ = self.multi_progress.clear();
    }
}
