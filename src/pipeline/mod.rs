// Pipeline stages. Each public `run*` function is one CLI subcommand's work.

pub mod analytics;
pub mod ingest;
pub mod report;
pub mod training;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::model::artifacts::{load_json, ModelBundle, VECTORIZER_FILE};
use crate::model::predict::BatchPredictor;
use crate::model::vectorizer::CountVectorizer;

/// Load the vectorizer and the configured model into a batch predictor.
///
/// Both files are required; a missing one is fatal and names the command
/// that produces it.
pub fn load_predictor(config: &Config) -> Result<BatchPredictor> {
    let vectorizer: CountVectorizer = load_json(&config.data_file(VECTORIZER_FILE), "features")?;
    let bundle: ModelBundle = load_json(&config.model_path(), config.model.produced_by())?;
    info!(
        model = bundle.estimator.name(),
        trained_at = %bundle.trained_at,
        vocabulary = vectorizer.vocabulary().len(),
        "Loaded hazard model"
    );
    Ok(BatchPredictor::new(Arc::new(vectorizer), Arc::new(bundle)))
}
