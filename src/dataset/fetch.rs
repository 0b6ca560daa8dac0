// Hazard report fetching: pulls reports from the backend API and flattens
// them into the rows of hazards.csv.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::store::models::id_from_value;

/// Path of the hazard listing endpoint on the backend.
pub const HAZARDS_ENDPOINT: &str = "/api/hazards";

/// One flattened hazard report, as written to hazards.csv.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardRow {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub hazard_type: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma-joined media file URLs
    pub media: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl HazardRow {
    /// Flatten a report object from the API. Missing pieces become None.
    pub fn from_report(report: &Value) -> Self {
        let text = |key: &str| report.get(key).and_then(Value::as_str).map(str::to_string);
        let location = report.get("location");
        let coordinate = |key: &str| location.and_then(|l| l.get(key)).and_then(Value::as_f64);

        let media = report
            .get("media")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|m| m.get("fileUrl").and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();

        Self {
            id: report.get("_id").map(id_from_value),
            hazard_type: text("type"),
            description: text("description"),
            latitude: coordinate("latitude"),
            longitude: coordinate("longitude"),
            media,
            created_at: text("createdAt"),
        }
    }
}

/// Client for the hazard reporting backend.
pub struct HazardApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HazardApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hazardscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch every hazard report as raw JSON objects.
    pub async fn fetch_hazards(&self) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url, HAZARDS_ENDPOINT);
        debug!(url = %url, "Fetching hazard reports");

        let reports: Vec<Value> = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?
            .json()
            .await
            .context("Hazard API did not return a JSON array")?;

        info!(count = reports.len(), "Retrieved hazard reports");
        Ok(reports)
    }
}

pub fn write_hazards_csv(rows: &[HazardRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_hazards_csv(path: &Path) -> Result<Vec<HazardRow>> {
    if !path.exists() {
        anyhow::bail!(
            "{} not found. Run `hazardscope fetch` first.",
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
