// Batch prediction adapter: texts in, hazard names out.
//
// Vectorizes a batch, runs the classifier once, and normalizes whatever the
// classifier returns into label strings. Numeric codes go through the label
// table derived from the classifier's class list when it was loaded; codes
// the table doesn't know become "unknown" instead of failing the batch.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use super::labels::LabelTable;
use super::traits::{HazardClassifier, RawPrediction, TextVectorizer};

#[derive(Clone)]
pub struct BatchPredictor {
    vectorizer: Arc<dyn TextVectorizer>,
    classifier: Arc<dyn HazardClassifier>,
    labels: Option<LabelTable>,
}

impl std::fmt::Debug for BatchPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchPredictor")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl BatchPredictor {
    /// Pair a vectorizer with a classifier, deriving the label table from
    /// the classifier's class list if it has one.
    pub fn new(vectorizer: Arc<dyn TextVectorizer>, classifier: Arc<dyn HazardClassifier>) -> Self {
        let labels = classifier.classes().map(LabelTable::from_classes);
        match &labels {
            Some(table) => info!(classes = ?table.names(), "Detected hazard classes from model"),
            None => info!("Model carries no class list; numeric predictions pass through as codes"),
        }
        Self {
            vectorizer,
            classifier,
            labels,
        }
    }

    /// Replace the label table used for numeric codes.
    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn labels(&self) -> Option<&LabelTable> {
        self.labels.as_ref()
    }

    /// Predict one label per text, in input order. An empty batch returns
    /// immediately without touching the vectorizer or the model.
    pub fn predict_labels(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let features = self.vectorizer.transform(texts);
        let raw = self.classifier.predict(&features);
        if raw.len() != texts.len() {
            anyhow::bail!(
                "Classifier returned {} predictions for {} texts",
                raw.len(),
                texts.len()
            );
        }

        debug!(batch = texts.len(), "Predicted hazard batch");
        Ok(raw.into_iter().map(|p| self.normalize(p)).collect())
    }

    /// Predict a single text.
    pub fn predict_one(&self, text: &str) -> Result<String> {
        let mut labels = self.predict_labels(&[text.to_string()])?;
        Ok(labels.remove(0))
    }

    fn normalize(&self, prediction: RawPrediction) -> String {
        match (prediction, &self.labels) {
            (RawPrediction::Code(code), Some(table)) => table.label(code).to_string(),
            (RawPrediction::Code(code), None) => code.to_string(),
            (RawPrediction::Label(label), _) => label,
        }
    }
}
