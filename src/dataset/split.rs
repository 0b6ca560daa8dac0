// Train/test split: stratified by class with a fixed seed so every run
// sees the same partition.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::model::traits::SparseVector;

pub const TEST_FRACTION: f64 = 0.3;
pub const SPLIT_SEED: u64 = 42;

/// Vectorized train and test partitions, saved between the features stage
/// and the training stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit {
    pub train_rows: Vec<SparseVector>,
    pub train_labels: Vec<usize>,
    pub test_rows: Vec<SparseVector>,
    pub test_labels: Vec<usize>,
    /// Class names indexed by label code
    pub classes: Vec<String>,
    pub n_features: usize,
}

/// Split row indices into (train, test), keeping each class's share of the
/// test set close to `test_fraction`.
///
/// A class with a single member can't be on both sides; it goes to train.
/// Every class with two or more members keeps at least one row in each side.
pub fn stratified_split(labels: &[usize], test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut members) in by_class {
        if members.len() < 2 {
            train.extend(members);
            continue;
        }
        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.clamp(1, members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_stratified() {
        let labels: Vec<usize> = (0..20).map(|i| if i < 10 { 0 } else { 1 }).collect();
        let (train, test) = stratified_split(&labels, TEST_FRACTION, SPLIT_SEED);
        assert_eq!(train.len() + test.len(), 20);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 0).count(), 3);
        assert_eq!(test.iter().filter(|&&i| labels[i] == 1).count(), 3);
    }

    #[test]
    fn test_split_is_deterministic() {
        let labels = vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2];
        assert_eq!(
            stratified_split(&labels, TEST_FRACTION, SPLIT_SEED),
            stratified_split(&labels, TEST_FRACTION, SPLIT_SEED)
        );
    }

    #[test]
    fn test_singleton_class_goes_to_train() {
        let labels = vec![0, 0, 0, 1];
        let (train, test) = stratified_split(&labels, TEST_FRACTION, SPLIT_SEED);
        assert!(train.contains(&3));
        assert!(!test.contains(&3));
        assert_eq!(test.len(), 1);
    }

    #[test]
    fn test_pair_class_keeps_one_on_each_side() {
        let labels = vec![5, 5];
        let (train, test) = stratified_split(&labels, TEST_FRACTION, SPLIT_SEED);
        assert_eq!((train.len(), test.len()), (1, 1));
    }
}
