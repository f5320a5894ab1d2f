// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that several layers depend on but that
// belong to none of them:
//
//   checkpoint.rs  — Model weight persistence via Burn's
//                    CompactRecorder, plus the TrainConfig JSON
//                    inference needs to rebuild the architecture.
//
//   vocab_store.rs — Per-language vocabulary persistence. Builds
//                    word-level vocabularies from the corpus if
//                    none exist, or loads the saved ones, so
//                    training and inference always agree on
//                    token ids.
//
//   metrics.rs     — Per-epoch metrics appended to a CSV file.
//
// Reference: Rust Book §7 (Modules), Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary building, saving, and loading
pub mod vocab_store;

/// Training metrics CSV logger
pub mod metrics;
