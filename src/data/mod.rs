// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw corpus files to tensor batches.
//
// The pipeline flows in this order:
//
//   .tsv files (source \t target per line)
//       │
//       ▼
//   TsvLoader          → reads files, extracts sentence pairs
//       │
//       ▼
//   Preprocessor       → cleans text (whitespace, encoding)
//       │
//       ▼
//   VocabStore         → words → token ID numbers (per language)
//       │
//       ▼
//   TranslationDataset → implements Burn's Dataset trait
//       │
//       ▼
//   TranslationBatcher → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader         → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads sentence pairs from tab-separated corpus files
pub mod loader;

/// Cleans and normalises raw corpus text
pub mod preprocessor;

/// Implements Burn's Dataset trait for translation samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
