// Report stage: turn the latest predictions CSV into hazard_report.md.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::output::charts::{BAR_CHART_FILE, PIE_CHART_FILE};
use crate::output::markdown::{generate_report, REPORT_FILE};
use crate::output::predictions::{count_labels, read_predictions_csv, PREDICTIONS_FILE};
use crate::output::terminal;

/// Write the report into `output_dir`. Returns its path, or None when there
/// are no predictions to report on yet.
pub fn run(output_dir: &Path) -> Result<Option<PathBuf>> {
    let csv_path = output_dir.join(PREDICTIONS_FILE);
    let Some(rows) = read_predictions_csv(&csv_path)? else {
        println!(
            "{}",
            format!("{} not found. Run `hazardscope analytics` first.", csv_path.display()).yellow()
        );
        return Ok(None);
    };

    let counts = count_labels(rows.iter().map(|r| r.predicted_hazard.as_str()));
    terminal::display_hazard_counts(&counts);

    let charts: Vec<&str> = [BAR_CHART_FILE, PIE_CHART_FILE]
        .into_iter()
        .filter(|name| output_dir.join(name).exists())
        .collect();

    let markdown = generate_report(&counts, &charts, chrono::Utc::now());
    let path = output_dir.join(REPORT_FILE);
    std::fs::write(&path, markdown).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "Wrote hazard report");
    Ok(Some(path))
}
