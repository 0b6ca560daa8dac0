// Model artifacts: JSON files passed between the training stages and the
// stages that predict.
//
// A trained classifier is saved as a ModelBundle: the fitted estimator plus
// the class names its codes index into. Loading any artifact that doesn't
// exist is a fatal startup error that names the command producing it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::logistic::LogisticRegression;
use super::naive_bayes::MultinomialNaiveBayes;
use super::traits::{HazardClassifier, RawPrediction, SparseVector};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const SPLIT_FILE: &str = "dataset_split.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const BASELINE_MODEL_FILE: &str = "hazard_model.json";
pub const IMPROVED_MODEL_FILE: &str = "hazard_model_improved.json";

/// The fitted estimator inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    NaiveBayes(MultinomialNaiveBayes),
}

impl Estimator {
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression(_) => "logistic regression",
            Estimator::NaiveBayes(_) => "multinomial naive Bayes",
        }
    }

    pub fn predict_code(&self, row: &SparseVector) -> usize {
        match self {
            Estimator::LogisticRegression(m) => m.predict_code(row),
            Estimator::NaiveBayes(m) => m.predict_code(row),
        }
    }
}

/// A trained classifier and the class names its codes refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub estimator: Estimator,
    /// Class names indexed by code. Older bundles may omit this.
    #[serde(default)]
    pub classes: Vec<String>,
    pub trained_at: String,
}

impl ModelBundle {
    pub fn new(estimator: Estimator, classes: Vec<String>) -> Self {
        Self {
            estimator,
            classes,
            trained_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Predict raw class codes for rows (no label mapping).
    pub fn predict_codes(&self, rows: &[SparseVector]) -> Vec<usize> {
        rows.iter().map(|r| self.estimator.predict_code(r)).collect()
    }
}

impl HazardClassifier for ModelBundle {
    fn predict(&self, rows: &[SparseVector]) -> Vec<RawPrediction> {
        self.predict_codes(rows)
            .into_iter()
            .map(|code| RawPrediction::Code(code as i64))
            .collect()
    }

    fn classes(&self) -> Option<&[String]> {
        if self.classes.is_empty() {
            None
        } else {
            Some(&self.classes)
        }
    }
}

/// Write any artifact as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved artifact");
    Ok(())
}

/// Load an artifact, bailing with a pointer to `produced_by` if it's missing.
pub fn load_json<T: DeserializeOwned>(path: &Path, produced_by: &str) -> Result<T> {
    if !path.exists() {
        anyhow::bail!(
            "Missing artifact: {}\nRun `hazardscope {}` to produce it.",
            path.display(),
            produced_by
        );
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Malformed artifact {}", path.display()))
}
