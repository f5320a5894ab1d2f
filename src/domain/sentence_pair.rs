// ============================================================
// Layer 3 — SentencePair Domain Type
// ============================================================
// One aligned example from the parallel corpus: a sentence in
// the source language and its translation in the target
// language. By the time a SentencePair exists, the text has
// already been pulled out of whatever file format it came from.

use serde::{Deserialize, Serialize};

/// A raw source/target sentence pair, before cleaning or tokenisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencePair {
    /// The sentence in the source language
    pub source: String,

    /// Its translation in the target language
    pub target: String,
}

impl SentencePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
