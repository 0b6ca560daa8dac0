// Multinomial logistic regression: the baseline hazard classifier.
//
// Softmax over one weight row per class, L2-regularized (strength 1/C, with
// intercepts left unpenalized), fit by full-batch gradient descent. Training
// stops after `max_iter` passes or once the loss stops moving.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::SparseVector;

/// Fixed training settings. There is no tuning step; these are the defaults
/// every run uses.
#[derive(Debug, Clone, Copy)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Stop once the loss changes by less than this between passes
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            learning_rate: 0.5,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One dense weight row per class
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticRegression {
    /// Fit on feature rows and class codes in `0..n_classes`.
    pub fn fit(
        rows: &[SparseVector],
        labels: &[usize],
        n_classes: usize,
        n_features: usize,
        params: &LogisticParams,
    ) -> Result<Self> {
        super::check_training_input(rows, labels, n_classes)?;

        let n = rows.len() as f64;
        let mut model = Self {
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
        };

        let mut previous_loss = f64::INFINITY;
        let mut iterations = 0;
        for iter in 0..params.max_iter {
            iterations = iter + 1;
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];
            let mut loss = 0.0;

            for (row, &label) in rows.iter().zip(labels) {
                let probs = model.predict_proba(row);
                loss -= probs[label].max(1e-15).ln();
                for (class, p) in probs.iter().enumerate() {
                    let g = if class == label { p - 1.0 } else { *p };
                    grad_b[class] += g;
                    for &(j, v) in &row.entries {
                        if j < n_features {
                            grad_w[class][j] += g * v;
                        }
                    }
                }
            }

            let penalty = 1.0 / (params.c * n);
            let norm: f64 = model.weights.iter().flatten().map(|w| w * w).sum();
            loss = loss / n + 0.5 * penalty * norm;

            for class in 0..n_classes {
                for j in 0..n_features {
                    let g = grad_w[class][j] / n + penalty * model.weights[class][j];
                    model.weights[class][j] -= params.learning_rate * g;
                }
                model.intercepts[class] -= params.learning_rate * grad_b[class] / n;
            }

            if iter % 100 == 0 {
                debug!(iter, loss, "Logistic regression progress");
            }
            if (previous_loss - loss).abs() < params.tolerance {
                break;
            }
            previous_loss = loss;
        }

        info!(
            iterations,
            classes = n_classes,
            features = n_features,
            "Fitted logistic regression"
        );
        Ok(model)
    }

    /// Class probabilities for one row.
    pub fn predict_proba(&self, row: &SparseVector) -> Vec<f64> {
        let scores: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| row.dot(w) + b)
            .collect();
        softmax(&scores)
    }

    pub fn predict_code(&self, row: &SparseVector) -> usize {
        super::argmax(&self.predict_proba(row))
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}
