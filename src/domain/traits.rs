// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The layers above program against these traits instead of
// concrete types, so implementations can be swapped without
// touching the callers:
//   - TsvLoader implements PairSource
//   - a future loader for another corpus format would too,
//     and the application layer would not change
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sentence_pair::SentencePair;

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can load a parallel corpus.
pub trait PairSource {
    /// Load all available sentence pairs from this source.
    fn load_all(&self) -> Result<Vec<SentencePair>>;
}

// ─── TranslationService ───────────────────────────────────────────────────────
/// Any component that can translate source-language text.
pub trait TranslationService {
    /// Translate one sentence into the target language.
    fn translate(&self, sentence: &str) -> Result<String>;
}
