//! Spinner shown while `packer build` runs
//!
//! Packer gives no overall progress, so the spinner's message is replaced
//! by each line Packer prints.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for the build of `template_file`
pub fn create_build_spinner(template_file: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed}] {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(format!("Building {}...", template_file.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Stop the spinner, leaving a line that reports how the build ended
pub fn finish_build_spinner(pb: &ProgressBar, succeeded: bool) {
    if succeeded {
        pb.finish_with_message("✅ Packer build completed");
    } else {
        pb.finish_with_message("⚠️  Packer build failed");
    }
}
