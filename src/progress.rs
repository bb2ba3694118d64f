//! Progress bar and logging utilities.
//!
//! The enrichment loop reports a percentage after each resolved row. On a
//! terminal this drives an indicatif bar; in log-only mode the same signal is
//! printed as plain lines for tail-friendly output.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Width of the progress bar; each cell is 5 percentage points.
pub const BAR_CELLS: usize = 20;

/// Receiver for enrichment progress signals.
pub trait ProgressSink {
    fn update(&mut self, processed: usize, total: usize);
}

/// Percentage of `total` done, 0 when there is nothing to do.
pub fn percent(processed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        processed as f64 / total as f64 * 100.0
    }
}

/// Fixed-width text rendering: ` [==========          ]  50.0% COMPLETE`
pub fn render_progress_line(percent: f64) -> String {
    let cells = ((percent / 5.0) as usize).min(BAR_CELLS);
    format!(
        " [{}{}] {:>5.1}% COMPLETE",
        "=".repeat(cells),
        " ".repeat(BAR_CELLS - cells),
        percent
    )
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// Console progress: indicatif bar, or plain stderr lines in log-only mode.
pub struct ConsoleProgress {
    bar: ProgressBar,
    log_only: bool,
}

impl ConsoleProgress {
    pub fn new(total: usize, log_only: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if log_only {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(" [{bar:20}] {msg} [{elapsed_precise}]")
                    .unwrap()
                    .progress_chars("= "),
            );
        }
        Self { bar, log_only }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl ProgressSink for ConsoleProgress {
    fn update(&mut self, processed: usize, total: usize) {
        let pct = percent(processed, total);
        if self.log_only {
            eprintln!("{}", render_progress_line(pct));
        } else {
            self.bar.set_position(processed as u64);
            self.bar.set_message(format!("{:>5.1}% COMPLETE", pct));
        }
    }
}
