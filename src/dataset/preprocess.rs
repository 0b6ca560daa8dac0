// Preprocessing: cleans report text and encodes hazard types as class codes.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fetch::HazardRow;
use crate::model::labels::UNKNOWN_LABEL;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, strip everything but ASCII letters, digits and whitespace
/// (any Unicode space counts), then collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lower, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Maps hazard type names to dense class codes (sorted name order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// A report row after cleaning, as written to hazards_clean.csv.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRow {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub hazard_type: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub media: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    pub clean_description: String,
    pub label: usize,
}

/// Drop rows without a description, clean the text, and encode the types.
pub fn preprocess(rows: Vec<HazardRow>) -> (Vec<CleanRow>, LabelEncoder) {
    let kept: Vec<(HazardRow, String, String)> = rows
        .into_iter()
        .filter_map(|row| {
            let description = row.description.clone()?;
            let hazard_type = row
                .hazard_type
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            Some((row, description, hazard_type))
        })
        .collect();

    let types: Vec<&str> = kept.iter().map(|(_, _, t)| t.as_str()).collect();
    let encoder = LabelEncoder::fit(&types);

    let cleaned = kept
        .into_iter()
        .map(|(row, description, hazard_type)| {
            // Every type was seen by fit, so encode always succeeds
            let label = encoder.encode(&hazard_type).unwrap_or_default();
            CleanRow {
                id: row.id,
                clean_description: clean_text(&description),
                description,
                hazard_type,
                latitude: row.latitude,
                longitude: row.longitude,
                media: row.media,
                created_at: row.created_at,
                label,
            }
        })
        .collect();

    (cleaned, encoder)
}

pub fn write_clean_csv(rows: &[CleanRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanRow>> {
    if !path.exists() {
        anyhow::bail!(
            "{} not found. Run `hazardscope preprocess` first.",
            path.display()
        );
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("Malformed row in {}", path.display()))?);
    }
    Ok(rows)
}
