// Getting data in: fetch reports from the backend, or load a JSON file of
// documents into a collection.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::dataset::fetch::{write_hazards_csv, HazardApiClient, HazardRow};
use crate::dataset::HAZARDS_CSV;
use crate::store::DocumentStore;

/// Fetch reports and write hazards.csv. Optionally also insert the raw
/// reports into `ingest_into`. Returns the number of rows written.
///
/// A failed request is logged and treated as zero rows, matching how the
/// stage behaves when the backend is simply empty.
pub async fn run_fetch(
    config: &Config,
    store: Option<(&dyn DocumentStore, &str)>,
) -> Result<usize> {
    let client = HazardApiClient::new(&config.api_url)?;
    let reports = match client.fetch_hazards().await {
        Ok(reports) => reports,
        Err(e) => {
            error!(error = %e, url = %config.api_url, "Failed to fetch hazard reports");
            Vec::new()
        }
    };

    if reports.is_empty() {
        println!("No data to save");
        return Ok(0);
    }

    let rows: Vec<HazardRow> = reports.iter().map(HazardRow::from_report).collect();
    let path = config.data_file(HAZARDS_CSV);
    write_hazards_csv(&rows, &path)?;
    println!("Saved {} reports to {}", rows.len(), path.display());

    if let Some((store, collection)) = store {
        let inserted = store.insert_documents(collection, &reports).await?;
        info!(collection, inserted, "Ingested fetched reports");
        println!("Inserted {inserted} reports into `{collection}`");
    }

    Ok(rows.len())
}

/// Read a JSON array of documents from `file`.
pub fn read_documents(file: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    match value {
        Value::Array(docs) => Ok(docs),
        _ => anyhow::bail!("{} must contain a JSON array of documents", file.display()),
    }
}

/// Insert every document in `file` into `collection`.
pub async fn run_ingest(store: &dyn DocumentStore, collection: &str, file: &Path) -> Result<usize> {
    let documents = read_documents(file)?;
    let inserted = store.insert_documents(collection, &documents).await?;
    info!(collection, inserted, file = %file.display(), "Ingested documents");
    Ok(inserted)
}
