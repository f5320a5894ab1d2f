// ============================================================
// Layer 2 — Translate Use Case
// ============================================================
// Loads everything a translation needs — the saved vocabularies,
// the training config, the latest checkpoint — and exposes a
// single translate() behind the TranslationService trait.

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::TranslationService;
use crate::infra::{checkpoint::CheckpointManager, vocab_store::VocabStore};
use crate::ml::translator::Translator;

pub struct TranslateUseCase {
    src_vocab:  Tokenizer,
    trg_vocab:  Tokenizer,
    translator: Translator,
}

impl TranslateUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let vocab_store = VocabStore::new(&checkpoint_dir);
        let src_vocab   = vocab_store.load("source")?;
        let trg_vocab   = vocab_store.load("target")?;

        let ckpt       = CheckpointManager::new(&checkpoint_dir);
        let translator = Translator::from_checkpoint(&ckpt)?;

        Ok(Self { src_vocab, trg_vocab, translator })
    }
}

impl TranslationService for TranslateUseCase {
    fn translate(&self, sentence: &str) -> Result<String> {
        // Same cleaning as at training time, or the vocabulary lookups
        // would disagree.
        let clean = Preprocessor::new().clean(sentence);
        self.translator.translate(&clean, &self.src_vocab, &self.trg_vocab)
    }
}
