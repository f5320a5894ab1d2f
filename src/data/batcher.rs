// ============================================================
// Layer 4 — Translation Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of samples
// into tensors the model can consume.
//
// All samples arrive pre-padded to the same length, so batching
// is a flatten-and-reshape:
//   [s1_t1 .. s1_tL, s2_t1 .. sN_tL]  →  [N, L]
//
// Source and target lengths may differ from each other, but each
// must be uniform across the batch.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::TranslationSample;

/// A batch of sentence pairs ready for the model forward pass.
/// Both tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Source token IDs — shape: [batch_size, src_len]
    pub source: Tensor<B, 2, Int>,

    /// Target token IDs — shape: [batch_size, trg_len].
    /// Column 0 is always the <sos> marker.
    pub target: Tensor<B, 2, Int>,
}

/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TranslationSample, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<TranslationSample>) -> TranslationBatch<B> {
        let batch_size = items.len();
        // Pre-padded upstream, so row 0 is representative.
        let src_len = items[0].source_ids.len();
        let trg_len = items[0].target_ids.len();

        let src_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.source_ids.iter().map(|&x| x as i32))
            .collect();

        let trg_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.target_ids.iter().map(|&x| x as i32))
            .collect();

        let source = Tensor::<B, 1, Int>::from_ints(src_flat.as_slice(), &self.device)
            .reshape([batch_size, src_len]);
        let target = Tensor::<B, 1, Int>::from_ints(trg_flat.as_slice(), &self.device)
            .reshape([batch_size, trg_len]);

        TranslationBatch { source, target }
    }
}
