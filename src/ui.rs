//! Terminal progress for a generation run: spinner plus coloured status lines.
//!
//! Everything here goes to stderr so stdout carries only the output path.

use std::path::Path;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner and status lines for one generation run.
pub struct JobProgress {
    /// Spinner; detail lines are printed above it.
    pb: ProgressBar,
    /// Success mark.
    green: Style,
    /// Retry warnings.
    yellow: Style,
    /// Labels of detail lines.
    dim: Style,
}

impl JobProgress {
    /// Start the spinner with an initial message.
    pub fn start(title: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(title.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(pb)
    }

    /// A progress handle that draws nothing.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(pb: ProgressBar) -> Self {
        Self {
            pb,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    /// Replace the spinner message with the current stage.
    pub fn stage(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Print a detail line above the spinner.
    pub fn note(&self, label: &str, value: impl std::fmt::Display) {
        self.pb
            .println(format!("  {} {value}", self.dim.apply_to(format!("{label}:"))));
    }

    /// Show the latest non-terminal status on the spinner.
    pub fn pending(&self, status: &str, elapsed: Duration) {
        self.pb.set_message(format!(
            "Waiting for job: status {status}, {}s elapsed",
            elapsed.as_secs()
        ));
    }

    /// Print a warning line; the run continues.
    pub fn warn(&self, msg: &str) {
        self.pb
            .println(format!("  {} {msg}", self.yellow.apply_to("!")));
    }

    /// Stop the spinner. On success the saved path is shown in green.
    pub fn complete<P: AsRef<Path>, E>(&self, result: &Result<P, E>) {
        self.pb.finish_and_clear();
        if let Ok(path) = result {
            eprintln!(
                "  {} Saved to {}",
                self.green.apply_to("✓"),
                path.as_ref().display()
            );
        }
    }
}
