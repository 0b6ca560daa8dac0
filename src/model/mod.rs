// Hazard classification: vectorizer, classifiers, label mapping, and the
// batch prediction adapter that ties them together.
//
// The traits in `traits` are the seam: the adapter and the prediction
// service only depend on TextVectorizer and HazardClassifier.

pub mod artifacts;
pub mod labels;
pub mod logistic;
pub mod naive_bayes;
pub mod predict;
pub mod traits;
pub mod vectorizer;

use anyhow::Result;

use traits::SparseVector;

/// Shared validation for the `fit` functions.
fn check_training_input(rows: &[SparseVector], labels: &[usize], n_classes: usize) -> Result<()> {
    if rows.is_empty() {
        anyhow::bail!("No training rows");
    }
    if rows.len() != labels.len() {
        anyhow::bail!(
            "{} training rows but {} labels",
            rows.len(),
            labels.len()
        );
    }
    if let Some(bad) = labels.iter().find(|&&l| l >= n_classes) {
        anyhow::bail!("Label {bad} out of range for {n_classes} classes");
    }
    Ok(())
}

/// Index of the largest score; the first one wins ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
