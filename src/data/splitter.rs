// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles the samples and splits them into a training set and
// a validation set. Parallel corpora are usually sorted (by
// length or by source), so splitting without shuffling would
// give the validation set a skewed slice of the data.
//
// The caller supplies the RNG: the training pipeline passes one
// seeded from the run config, so the same seed always yields the
// same split membership.
//
// Uses Fisher-Yates via rand::seq::SliceRandom.

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` with the given RNG and split into (train, validation).
///
/// `train_fraction` is the proportion kept for training, e.g. 0.8.
pub fn split_train_val<T, R: Rng>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    // Clamp so tiny datasets never panic.
    let split_at = split_at.min(total);

    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}
