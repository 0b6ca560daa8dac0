// Classifier evaluation: accuracy, per-class report, confusion matrix.
//
// Metrics follow the usual definitions. A class with no predicted (or no
// true) rows gets 0 for the metric that would divide by zero, instead of NaN.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Square matrix: `counts[true][predicted]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

/// Fraction of positions where prediction equals truth. Empty input is 0.
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    hits as f64 / truth.len() as f64
}

pub fn confusion_matrix(truth: &[usize], predicted: &[usize], labels: &[String]) -> ConfusionMatrix {
    let n = labels.len();
    let mut counts = vec![vec![0; n]; n];
    for (&t, &p) in truth.iter().zip(predicted) {
        if t < n && p < n {
            counts[t][p] += 1;
        }
    }
    ConfusionMatrix {
        labels: labels.to_vec(),
        counts,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub fn classification_report(truth: &[usize], predicted: &[usize], labels: &[String]) -> ClassificationReport {
    let matrix = confusion_matrix(truth, predicted, labels);
    let n = labels.len();

    let classes: Vec<ClassMetrics> = (0..n)
        .map(|c| {
            let true_positive = matrix.counts[c][c];
            let support: usize = matrix.counts[c].iter().sum();
            let predicted_count: usize = matrix.counts.iter().map(|row| row[c]).sum();
            let precision = ratio(true_positive, predicted_count);
            let recall = ratio(true_positive, support);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                label: labels[c].clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let total: usize = classes.iter().map(|m| m.support).sum();
    let average = |label: &str, weight: &dyn Fn(&ClassMetrics) -> f64, norm: f64| {
        let norm = if norm == 0.0 { 1.0 } else { norm };
        ClassMetrics {
            label: label.to_string(),
            precision: classes.iter().map(|m| m.precision * weight(m)).sum::<f64>() / norm,
            recall: classes.iter().map(|m| m.recall * weight(m)).sum::<f64>() / norm,
            f1: classes.iter().map(|m| m.f1 * weight(m)).sum::<f64>() / norm,
            support: total,
        }
    };
    let macro_avg = average("macro avg", &|_| 1.0, n as f64);
    let weighted_avg = average("weighted avg", &|m| m.support as f64, total as f64);

    ClassificationReport {
        accuracy: accuracy(truth, predicted),
        classes,
        macro_avg,
        weighted_avg,
    }
}

impl ClassificationReport {
    /// Fixed-width text table in the familiar report layout.
    pub fn to_table(&self) -> String {
        let width = self
            .classes
            .iter()
            .map(|m| m.label.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);

        let mut out = format!(
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}\n\n",
            "", "precision", "recall", "f1-score", "support"
        );
        let row = |m: &ClassMetrics| {
            format!(
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
                m.label, m.precision, m.recall, m.f1, m.support
            )
        };
        for m in &self.classes {
            out.push_str(&row(m));
        }
        out.push('\n');
        out.push_str(&format!(
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}\n",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        ));
        out.push_str(&row(&self.macro_avg));
        out.push_str(&row(&self.weighted_avg));
        out
    }
}
