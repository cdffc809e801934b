//! Human-readable progress and diagnostics. Everything here writes to
//! stderr; stdout is reserved for machine-readable JSON (spec §5/§9).
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub fn info(message: &str) {
    eprintln!("{} {}", style("info:").blue().bold(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", style("warn:").yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

pub fn download_progress_bar(label: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(label.to_string());
    pb
}
