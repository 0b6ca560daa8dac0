// Vectorizer and classifier traits: the seams the prediction adapter and
// the prediction service are written against.
//
// The crate ships a count vectorizer and two classifiers (logistic
// regression, multinomial naive Bayes), but callers only see these traits,
// so tests can substitute fakes and new model families slot in unchanged.

use serde::{Deserialize, Serialize};

/// Sparse feature vector: (feature index, value) pairs in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product against a dense weight row.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }
}

/// What a classifier hands back for one input row.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrediction {
    /// A class code, to be mapped through the model's class list.
    Code(i64),
    /// A label the model already expressed as text.
    Label(String),
}

/// Turns free text into feature vectors.
pub trait TextVectorizer: Send + Sync {
    /// Transform texts into feature vectors, one per text, same order.
    fn transform(&self, texts: &[String]) -> Vec<SparseVector>;

    /// Number of features each vector can address.
    fn feature_count(&self) -> usize;
}

/// Assigns a hazard class to each feature vector.
pub trait HazardClassifier: Send + Sync {
    /// Predict one class per row, same order.
    fn predict(&self, rows: &[SparseVector]) -> Vec<RawPrediction>;

    /// Class names indexed by code, if the model carries them.
    fn classes(&self) -> Option<&[String]> {
        None
    }
}
