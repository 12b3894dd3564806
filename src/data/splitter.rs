// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Splits encoded samples into a training set (weights are
// updated on it) and a validation set (accuracy is reported on
// it, the model never trains on it).
//
// Why shuffle before splitting?
//   Record files are usually ordered by image id, so consecutive
//   questions share an image. Without shuffling, the validation
//   set would only contain the last images of the file.
//
// Only used when no separate validation file is given.
// Split ratio: 80% training, 20% validation (configurable)
//
// The shuffle is seeded so a run can be repeated with the same
// split; Fisher-Yates via rand::seq::SliceRandom.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with a seeded RNG and split off the first
/// `train_fraction` (rounded) as the training set.
pub fn split_train_val<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    samples.shuffle(&mut StdRng::seed_from_u64(seed));

    let total    = samples.len();
    let split_at = (((total as f64) * train_fraction).round() as usize).min(total);
    let val      = samples.split_off(split_at);

    tracing::debug!("Dataset split (seed {}): {} training, {} validation", seed, samples.len(), val.len());
    (samples, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.8, 1);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.7, 1);
        assert_eq!(train.len() + val.len(), 50);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.8, 1);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction means everything goes to training
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, 1);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_val((0..30).collect::<Vec<usize>>(), 0.5, 7);
        let (b, _) = split_train_val((0..30).collect::<Vec<usize>>(), 0.5, 7);
        assert_eq!(a, b);
    }
}
