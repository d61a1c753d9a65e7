//! Terminal progress indicators for long-running stages.
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Bar counting decoded points.
pub fn points_bar(total_points: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(total_points);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message(message);
    pb
}

/// Spinner with elapsed time, for work whose length is unknown.
pub fn engine_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
