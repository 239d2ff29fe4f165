// src/progress.rs

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_CHARS: &str = "█▓░";

/// Progress bar tracking solver iterations against the outer iteration cap. The
/// solve usually converges well before the cap, so the bar finishing early is the
/// good outcome.
pub fn solve_progress_bar(label: impl Into<String>, max_iterations: u64) -> ProgressBar {
    let pb = ProgressBar::new(max_iterations);
    pb.set_style(
        ProgressStyle::with_template(
            "{prefix:.bold.dim} {spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} iterations {msg}",
        )
        .unwrap()
        .progress_chars(BAR_CHARS),
    );
    pb.set_prefix(label.into());
    pb.enable_steady_tick(Duration::from_millis(75));
    pb
}
