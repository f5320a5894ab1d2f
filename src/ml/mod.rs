// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// (and the batcher, which stacks samples into tensors).
//
// What's in this layer:
//
//   cell.rs       — Single-step GRU and LSTM cells built from
//                   Linear layers; the only recurrence math in
//                   the repo
//
//   seq2seq.rs    — The Encoder/Decoder contracts, the decode
//                   loop with teacher forcing (the sequence
//                   driver), and the position-0/padding-aware
//                   cross-entropy loss
//
//   gru.rs        — GRU variant: single layer, encoder's final
//                   hidden state carried as an immutable context
//                   vector into every decode step
//
//   lstm.rs       — LSTM variant: stacked layers, per-layer
//                   hidden/cell pairs threaded as a unit
//
//   trainer.rs    — Epoch loop: forward, loss, backward, Adam
//                   step with norm clipping, validation at
//                   teacher-forcing ratio 0, checkpoints
//
//   translator.rs — Greedy inference from a saved checkpoint
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Sutskever et al. (2014), Cho et al. (2014)

/// Single-step recurrent cells
pub mod cell;

/// Encoder/Decoder contracts, decode loop, sequence loss
pub mod seq2seq;

/// GRU variant with a fixed context vector
pub mod gru;

/// Stacked LSTM variant
pub mod lstm;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads a checkpoint and translates
pub mod translator;
