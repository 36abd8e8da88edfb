// ============================================================
// Layer 4 — Train/Hold-out Splitter
// ============================================================
// Shuffles cleaned rows with a seeded RNG and splits them into
// a fitting set and an optional hold-out set used only for
// reporting. The seed makes a training run reproducible.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::table::TrainingTable;

/// Shuffle `samples` with `seed` and split into (train, hold-out).
/// `train_fraction` is clamped to [0, 1].
pub fn split_train_val<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let val = samples.split_off(split_at.min(total));

    tracing::debug!("Dataset split: {} training, {} hold-out", samples.len(), val.len());
    (samples, val)
}

/// Split a training table, holding out `holdout` of its rows.
/// A zero hold-out keeps every row, in the original order.
pub fn split_table(table: TrainingTable, holdout: f64, seed: u64) -> (TrainingTable, TrainingTable) {
    if holdout <= 0.0 {
        return (table, TrainingTable::new());
    }
    let (train, val) = split_train_val(table.into_rows(), 1.0 - holdout, seed);
    (train.into_iter().collect(), val.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::encoder::tests::record;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val) = split_train_val(items, 0.8, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, val) = split_train_val(items, 0.7, 7);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_val((0..30).collect::<Vec<u32>>(), 0.5, 42);
        let b = split_train_val((0..30).collect::<Vec<u32>>(), 0.5, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = split_train_val(Vec::<usize>::new(), 0.8, 1);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_zero_holdout_keeps_table() {
        let table: TrainingTable = (0..4)
            .map(|i| (record("Two year", "DSL", [i as f64, 1.0, 1.0]), (i % 2) as u8))
            .collect();
        let (train, val) = split_table(table.clone(), 0.0, 1);
        assert_eq!(train, table);
        assert!(val.is_empty());

        let (train, val) = split_table(table, 0.25, 1);
        assert_eq!((train.len(), val.len()), (3, 1));
    }
}
