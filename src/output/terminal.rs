// Colored terminal output for hazard counts, predictions, and training runs.
//
// This module handles all terminal-specific formatting: colors, tables,
// progress indicators. The pipeline stages and main.rs delegate here.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::evaluation::ClassificationReport;
use crate::output::predictions::PredictionRow;

/// Display per-hazard counts as a bar table.
pub fn display_hazard_counts(counts: &[(String, u64)]) {
    if counts.is_empty() {
        println!("No predictions to summarize.");
        return;
    }

    let total: u64 = counts.iter().map(|(_, c)| c).sum();
    println!(
        "\n{}",
        format!("=== Hazard Summary ({total} requests) ===").bold()
    );
    println!();
    println!(
        "  {:<20} {:>7}  {}",
        "Hazard".dimmed(),
        "Count".dimmed(),
        "Share".dimmed()
    );
    println!("  {}", "-".repeat(50).dimmed());

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    for (hazard, count) in counts {
        let bar_len = ((*count as f64 / max as f64) * 20.0).round() as usize;
        let share = *count as f64 / total as f64 * 100.0;
        println!(
            "  {:<20} {:>7}  {} {:.1}%",
            colorize_hazard(hazard),
            count,
            "#".repeat(bar_len).cyan(),
            share
        );
    }
    println!();
}

/// Show the first few predictions as a preview.
pub fn display_prediction_preview(rows: &[PredictionRow], limit: usize) {
    if rows.is_empty() {
        return;
    }
    println!("{}", format!("First {} predictions:", limit.min(rows.len())).bold());
    for row in rows.iter().take(limit) {
        let preview = super::truncate_chars(&row.description, 60);
        println!(
            "  [{}] {:<62} -> {}",
            row.collection.dimmed(),
            preview,
            colorize_hazard(&row.predicted_hazard)
        );
    }
    println!();
}

/// Print a classification report under a heading.
pub fn display_report(title: &str, report: &ClassificationReport) {
    println!("\n{}", format!("=== {title} ===").bold());
    println!("{}", report.to_table());
}

/// Print a train/test accuracy pair.
pub fn display_accuracy(train: f64, test: f64) {
    println!("  Train accuracy: {}", format!("{train:.4}").green());
    println!("  Test accuracy:  {}", format!("{test:.4}").green());
}

/// Spinner that keeps ticking while a blocking step (like model fitting) runs.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Counter for a stream of unknown length.
pub fn progress_counter(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} {pos}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// Colorize a hazard label.
fn colorize_hazard(hazard: &str) -> colored::ColoredString {
    match hazard {
        "cyclone" | "storm surge" => hazard.magenta(),
        "fire" => hazard.red().bold(),
        "flood" | "high waves" => hazard.blue(),
        "earthquake" => hazard.yellow(),
        "unknown" => hazard.dimmed(),
        _ => hazard.normal(),
    }
}
