//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for document annotation
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize the progress bar; a single document gets none
    pub fn init_files(&mut self, total_files: u64) {
        if self.quiet || total_files < 2 {
            return;
        }

        let pb = ProgressBar::new(total_files);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Update progress for an annotated document
    pub fn file_completed(&self, filename: &str, spans: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{filename}: {spans} span(s)"));
            pb.inc(1);
        }
    }

    /// Print a line without tearing the bar
    pub fn println(&self, line: &str) {
        match &self.progress_bar {
            Some(pb) => pb.println(line),
            None => eprintln!("{line}"),
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }

    /// Whether a bar is being drawn
    pub fn is_active(&self) -> bool {
        self.progress_bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_files(10);
        assert!(!reporter.is_active());
        reporter.file_completed("a.txt", 3);
        reporter.finish();
    }

    #[test]
    fn test_bar_for_many_files() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_files(1);
        assert!(!reporter.is_active());

        reporter.init_files(3);
        assert!(reporter.is_active());
        reporter.file_completed("a.txt", 0);
        reporter.finish();
    }
}
