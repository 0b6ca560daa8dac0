// Multinomial naive Bayes: the improved hazard classifier.
//
// Per-class term distributions with Laplace smoothing. Works directly on
// count vectors and trains in one pass, which suits the small, sparse
// report corpus better than the gradient-descent baseline.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::traits::SparseVector;

/// Additive (Laplace) smoothing applied to every term count.
pub const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    class_log_prior: Vec<f64>,
    /// log P(term | class), one dense row per class
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    pub fn fit(
        rows: &[SparseVector],
        labels: &[usize],
        n_classes: usize,
        n_features: usize,
        alpha: f64,
    ) -> Result<Self> {
        super::check_training_input(rows, labels, n_classes)?;

        let mut class_count = vec![0.0; n_classes];
        let mut feature_count = vec![vec![0.0; n_features]; n_classes];
        for (row, &label) in rows.iter().zip(labels) {
            class_count[label] += 1.0;
            for &(j, v) in &row.entries {
                if j < n_features {
                    feature_count[label][j] += v;
                }
            }
        }

        let total = rows.len() as f64;
        // Classes absent from training get the lowest finite prior (JSON has no -inf)
        let class_log_prior = class_count
            .iter()
            .map(|&c| if c > 0.0 { (c / total).ln() } else { f64::MIN })
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let denom = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts.iter().map(|c| ((c + alpha) / denom).ln()).collect()
            })
            .collect();

        info!(
            classes = n_classes,
            features = n_features,
            alpha,
            "Fitted multinomial naive Bayes"
        );

        Ok(Self {
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Unnormalized log posterior per class.
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| prior + row.dot(log_prob))
            .collect()
    }

    pub fn predict_code(&self, row: &SparseVector) -> usize {
        super::argmax(&self.joint_log_likelihood(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(usize, f64)]) -> SparseVector {
        SparseVector {
            entries: entries.to_vec(),
        }
    }

    #[test]
    fn test_predicts_dominant_terms() {
        // 0 = "fire", 1 = "smoke", 2 = "water", 3 = "rising"
        let rows = vec![
            row(&[(0, 1.0), (1, 1.0)]),
            row(&[(0, 2.0)]),
            row(&[(2, 1.0), (3, 1.0)]),
            row(&[(2, 1.0)]),
        ];
        let model = MultinomialNaiveBayes::fit(&rows, &[0, 0, 1, 1], 2, 4, DEFAULT_ALPHA).unwrap();
        assert_eq!(model.predict_code(&row(&[(1, 1.0)])), 0);
        assert_eq!(model.predict_code(&row(&[(3, 2.0)])), 1);
    }

    #[test]
    fn test_empty_row_falls_back_to_prior() {
        let rows = vec![row(&[(0, 1.0)]), row(&[(0, 1.0)]), row(&[(1, 1.0)])];
        let model = MultinomialNaiveBayes::fit(&rows, &[1, 1, 0], 2, 2, DEFAULT_ALPHA).unwrap();
        assert_eq!(model.predict_code(&SparseVector::default()), 1);
    }

    #[test]
    fn test_unseen_class_is_never_predicted() {
        let rows = vec![row(&[(0, 1.0)]), row(&[(1, 1.0)])];
        let model = MultinomialNaiveBayes::fit(&rows, &[0, 0], 3, 2, DEFAULT_ALPHA).unwrap();
        assert_eq!(model.predict_code(&row(&[(1, 5.0)])), 0);
    }

    #[test]
    fn test_log_probs_are_normalized() {
        let rows = vec![row(&[(0, 3.0), (1, 1.0)])];
        let model = MultinomialNaiveBayes::fit(&rows, &[0], 1, 3, DEFAULT_ALPHA).unwrap();
        let total: f64 = model.feature_log_prob[0].iter().map(|lp| lp.exp()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
