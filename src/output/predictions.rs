// Combined predictions CSV: one row per text record with its predicted hazard.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PREDICTIONS_FILE: &str = "all_requests_with_predictions.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub collection: String,
    pub description: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub predicted_hazard: String,
}

pub fn write_predictions_csv(rows: &[PredictionRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the predictions CSV, or None if it hasn't been written yet.
pub fn read_predictions_csv(path: &Path) -> Result<Option<Vec<PredictionRow>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<PredictionRow>, _>>()
        .with_context(|| format!("Malformed row in {}", path.display()))?;
    Ok(Some(rows))
}

/// Count rows per label: highest count first, ties in order of first appearance.
pub fn count_labels<'a, I>(labels: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, u64)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(name, _)| name == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }
    // Stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
