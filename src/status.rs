// System status display: shows store contents, trained artifacts, and the
// latest hazard summary.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::model::artifacts::{
    BASELINE_MODEL_FILE, IMPROVED_MODEL_FILE, LABEL_ENCODER_FILE, SPLIT_FILE, VECTORIZER_FILE,
};
use crate::output::markdown::REPORT_FILE;
use crate::output::predictions::PREDICTIONS_FILE;
use crate::store::DocumentStore;

/// Display system status to the terminal.
pub async fn show(store: Option<&Arc<dyn DocumentStore>>, config: &Config) -> Result<()> {
    match store {
        None => {
            println!("Store: not initialized");
            println!("  Run `hazardscope init` to create it.");
        }
        Some(store) => {
            let file_size = std::fs::metadata(&config.db_path)
                .map(|m| format_bytes(m.len()))
                .unwrap_or_else(|_| "unknown".to_string());
            println!("Store: {} ({})", config.db_path, file_size);

            let collections = store.list_collections().await?;
            if collections.is_empty() {
                println!("Collections: none yet");
                println!("  Run `hazardscope ingest` or `hazardscope fetch --ingest` to load some");
            } else {
                println!("Collections:");
                for name in &collections {
                    let count = store.count_documents(name).await?;
                    println!("  {name:<32} {count:>8} documents");
                }
            }

            // Latest summary run
            let summaries = store.sample_documents(&config.summary_collection, 1).await?;
            match summaries
                .first()
                .and_then(|doc| doc.get("generated_at"))
                .and_then(|v| v.as_str())
            {
                Some(at) => println!("Last summary: {at}"),
                None => println!("Last summary: never"),
            }
        }
    }

    println!("\nArtifacts in {}:", config.data_dir.display());
    for (file, produced_by) in [
        (LABEL_ENCODER_FILE, "preprocess"),
        (VECTORIZER_FILE, "features"),
        (SPLIT_FILE, "features"),
        (BASELINE_MODEL_FILE, "train"),
        (IMPROVED_MODEL_FILE, "improve"),
    ] {
        print_artifact(&config.data_dir.join(file), produced_by);
    }

    println!("\nOutputs in {}:", config.output_dir.display());
    for (file, produced_by) in [(PREDICTIONS_FILE, "analytics"), (REPORT_FILE, "report")] {
        print_artifact(&config.output_dir.join(file), produced_by);
    }

    println!("\nActive model: {}", config.model.file_name());
    Ok(())
}

fn print_artifact(path: &Path, produced_by: &str) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match std::fs::metadata(path) {
        Ok(meta) => println!("  {:<36} {}", name, format_bytes(meta.len())),
        Err(_) => println!("  {:<36} missing (run `hazardscope {}`)", name, produced_by),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
