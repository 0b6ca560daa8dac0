// Analytics pass: find the request collections, pull their free text,
// classify it, and publish per-hazard counts.
//
// Steps, in order, each awaited before the next:
//   1. resolve which collections hold requests
//   2. per collection, sample documents and resolve the text field
//   3. stream every usable text record out of the collection
//   4. classify all records in one batch
//   5. count per hazard, write the CSV and charts
//   6. replace the summary collection with the new counts
//
// Nothing found at step 1 or 3 is not an error: the pass prints a notice
// and returns without writing any artifact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use futures::TryStreamExt;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::model::predict::BatchPredictor;
use crate::output::charts::{write_bar_chart, write_pie_chart, BAR_CHART_FILE, PIE_CHART_FILE};
use crate::output::predictions::{count_labels, write_predictions_csv, PredictionRow, PREDICTIONS_FILE};
use crate::output::terminal;
use crate::resolver::collections::{resolve_collections, CategoryKeywords, STANDARD_KEYWORDS};
use crate::resolver::extract::{text_records, TextRecord};
use crate::resolver::fields::{resolve_field, FIELD_PRIORITIES, FIELD_SAMPLE_SIZE};
use crate::store::models::HazardSummary;
use crate::store::{DocumentStore, MemoryStore};

/// Knobs for one analytics run.
#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    pub output_dir: PathBuf,
    pub sample_size: usize,
    pub summary_collection: String,
    pub field_priorities: Vec<String>,
    pub keywords: &'static [CategoryKeywords],
}

impl AnalyticsSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            sample_size: config.sample_size,
            summary_collection: config.summary_collection.clone(),
            ..Self::with_output_dir(&config.output_dir)
        }
    }

    /// Default settings writing into `output_dir`.
    pub fn with_output_dir(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            sample_size: FIELD_SAMPLE_SIZE,
            summary_collection: crate::config::DEFAULT_SUMMARY_COLLECTION.to_string(),
            field_priorities: FIELD_PRIORITIES.iter().map(|s| s.to_string()).collect(),
            keywords: STANDARD_KEYWORDS,
        }
    }
}

/// Everything the pass needs, built once by the caller.
pub struct AnalyticsContext {
    pub store: Arc<dyn DocumentStore>,
    pub predictor: BatchPredictor,
    pub settings: AnalyticsSettings,
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsOutcome {
    /// Collections that were resolved, whether or not a field was found
    pub collections: Vec<String>,
    pub rows: Vec<PredictionRow>,
    pub counts: Vec<(String, u64)>,
    /// Files written, empty when there was nothing to analyze
    pub artifacts: Vec<PathBuf>,
    pub summaries_written: usize,
}

/// Run the full analytics pass.
pub async fn run(ctx: &AnalyticsContext) -> Result<AnalyticsOutcome> {
    let settings = &ctx.settings;

    // Step 1: which collections hold requests
    let catalog: Vec<String> = ctx
        .store
        .list_collections()
        .await?
        .into_iter()
        .filter(|name| name != &settings.summary_collection)
        .collect();
    let collections = resolve_collections(&catalog, settings.keywords);
    info!(catalog = catalog.len(), resolved = ?collections, "Resolved request collections");

    if collections.is_empty() {
        println!("{}", "No request collections found. Nothing to analyze.".yellow());
        return Ok(AnalyticsOutcome::default());
    }

    // Steps 2 and 3: field per collection, then every text record
    let mut records: Vec<TextRecord> = Vec::new();
    for collection in &collections {
        let sample = ctx
            .store
            .sample_documents(collection, settings.sample_size)
            .await?;
        let Some(field) = resolve_field(&sample, &settings.field_priorities) else {
            warn!(collection = %collection, sampled = sample.len(), "No text field found, skipping collection");
            continue;
        };
        info!(collection = %collection, field = %field, "Resolved text field");

        let pb = terminal::progress_counter(&format!("Reading {collection}"));
        let before = records.len();
        let mut stream = Box::pin(text_records(ctx.store.as_ref(), collection, &field));
        while let Some(record) = stream.try_next().await? {
            records.push(record);
            pb.inc(1);
        }
        pb.finish_and_clear();
        info!(collection = %collection, records = records.len() - before, "Extracted text records");
    }

    if records.is_empty() {
        println!("{}", "No request text found in the resolved collections.".yellow());
        return Ok(AnalyticsOutcome {
            collections,
            ..Default::default()
        });
    }

    // Step 4: one batch for everything
    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let labels = ctx.predictor.predict_labels(&texts)?;

    let rows: Vec<PredictionRow> = records
        .into_iter()
        .zip(labels)
        .map(|(record, predicted_hazard)| PredictionRow {
            collection: record.collection,
            description: record.text,
            id: record.source_id,
            predicted_hazard,
        })
        .collect();

    // Step 5: counts and files
    let counts = count_labels(rows.iter().map(|r| r.predicted_hazard.as_str()));

    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("Failed to create {}", settings.output_dir.display()))?;
    let csv_path = settings.output_dir.join(PREDICTIONS_FILE);
    let bar_path = settings.output_dir.join(BAR_CHART_FILE);
    let pie_path = settings.output_dir.join(PIE_CHART_FILE);
    write_predictions_csv(&rows, &csv_path)?;
    write_bar_chart(&counts, &bar_path)?;
    write_pie_chart(&counts, &pie_path)?;
    info!(rows = rows.len(), dir = %settings.output_dir.display(), "Wrote analytics outputs");

    // Step 6: summary write-back
    let generated_at = chrono::Utc::now().to_rfc3339();
    let summaries = counts
        .iter()
        .map(|(hazard, count)| {
            serde_json::to_value(HazardSummary {
                hazard: hazard.clone(),
                count: *count,
                generated_at: generated_at.clone(),
            })
        })
        .collect::<Result<Vec<Value>, _>>()?;
    let summaries_written = ctx
        .store
        .replace_collection(&settings.summary_collection, &summaries)
        .await?;
    info!(collection = %settings.summary_collection, count = summaries_written, "Replaced hazard summaries");

    Ok(AnalyticsOutcome {
        collections,
        rows,
        counts,
        artifacts: vec![csv_path, bar_path, pie_path],
        summaries_written,
    })
}

/// Load a JSON export, an object of `collection -> [documents]`, into an
/// in-memory store. Key order is kept as the catalog order.
pub async fn load_json_export(path: &Path) -> Result<MemoryStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let export: Map<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of collections", path.display()))?;

    let mut seed = Vec::with_capacity(export.len());
    for (name, docs) in export {
        let Value::Array(docs) = docs else {
            anyhow::bail!("Collection `{name}` in {} is not an array", path.display());
        };
        seed.push((name, docs));
    }
    MemoryStore::with_collections(seed).await
}
