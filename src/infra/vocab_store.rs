// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Builds, saves, and loads the per-language vocabularies.
//
// Each language gets its own word-level tokenizer, built by
// frequency from the corpus and written as HuggingFace
// tokenizers JSON. Building the JSON directly sidesteps the
// trainer type mismatch in tokenizers 0.15 (train_from_files
// requires Trainer::Model = ModelWrapper) and guarantees that
// training and inference use the same vocabulary files.
//
// Ids 0–3 are reserved in every vocabulary:
//   0 <pad>   padding — masked out of the loss
//   1 <unk>   out-of-vocabulary words
//   2 <sos>   start marker — always the first decoder input
//   3 <eos>   end marker — stops greedy decoding

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub const PAD_ID: usize = 0;
pub const UNK_ID: usize = 1;
pub const SOS_ID: usize = 2;
pub const EOS_ID: usize = 3;

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Load the existing vocabulary for `lang` ("source"/"target") or
    /// build a new one from the given texts.
    pub fn load_or_build(
        &self,
        lang:       &str,
        texts:      &[String],
        vocab_size: usize,
    ) -> Result<Tokenizer> {
        let path = self.vocab_path(lang);
        if path.exists() {
            tracing::info!("Loading existing {lang} vocabulary from disk");
            self.load(lang)
        } else {
            tracing::info!("Building new {lang} vocabulary (vocab_size={vocab_size})");
            self.build_and_save(lang, texts, vocab_size)
        }
    }

    /// Load a previously saved vocabulary.
    pub fn load(&self, lang: &str) -> Result<Tokenizer> {
        let path = self.vocab_path(lang);
        Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load {lang} vocabulary from '{}': {e}", path.display())
        })
    }

    fn vocab_path(&self, lang: &str) -> PathBuf {
        self.dir.join(format!("{lang}.vocab.json"))
    }

    /// Build a word-level vocabulary from corpus texts and write it as
    /// tokenizer JSON, then load it back as a Tokenizer.
    fn build_and_save(&self, lang: &str, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir).ok();

        // ── Step 1: Count word frequencies ────────────────────────────────────
        use std::collections::HashMap;
        let mut freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in text.split_whitespace() {
                let w = word.to_lowercase();
                let w = w.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        // Most frequent first; reserve 4 slots for the special tokens.
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(4));

        // ── Step 2: Build the vocab map ───────────────────────────────────────
        let mut vocab = serde_json::json!({
            "<pad>": PAD_ID,
            "<unk>": UNK_ID,
            "<sos>": SOS_ID,
            "<eos>": EOS_ID,
        });

        let mut next_id = 4usize;
        for (word, _) in &words {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_ID, "content": "<pad>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": UNK_ID, "content": "<unk>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": SOS_ID, "content": "<sos>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": EOS_ID, "content": "<eos>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "<unk>"
            }
        });

        let path = self.vocab_path(lang);
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write {lang} vocabulary JSON"))?;

        tracing::info!(
            "{lang} vocabulary built with {} entries, saved to '{}'",
            next_id,
            path.display()
        );

        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot reload {lang} vocabulary: {e}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> VocabStore {
        let dir = std::env::temp_dir().join(format!("seq2seq-nmt-vocab-{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        VocabStore::new(dir.to_string_lossy().to_string())
    }

    #[test]
    fn test_special_tokens_have_reserved_ids() {
        let store = temp_store("specials");
        let texts = vec!["good morning".to_string(), "good night".to_string()];
        let tok = store.load_or_build("target", &texts, 100).unwrap();

        assert_eq!(tok.token_to_id("<pad>"), Some(PAD_ID as u32));
        assert_eq!(tok.token_to_id("<unk>"), Some(UNK_ID as u32));
        assert_eq!(tok.token_to_id("<sos>"), Some(SOS_ID as u32));
        assert_eq!(tok.token_to_id("<eos>"), Some(EOS_ID as u32));
    }

    #[test]
    fn test_corpus_words_start_after_specials() {
        let store = temp_store("words");
        let texts = vec!["good morning".to_string(), "good night".to_string()];
        let tok = store.load_or_build("target", &texts, 100).unwrap();

        let enc = tok.encode("good morning", false).unwrap();
        assert_eq!(enc.get_ids().len(), 2);
        assert!(enc.get_ids().iter().all(|&id| id >= 4));
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let store = temp_store("unk");
        let texts = vec!["good morning".to_string()];
        let tok = store.load_or_build("target", &texts, 100).unwrap();

        let enc = tok.encode("zebra", false).unwrap();
        assert_eq!(enc.get_ids().to_vec(), vec![UNK_ID as u32]);
    }

    #[test]
    fn test_vocab_size_cap_is_respected() {
        let store = temp_store("cap");
        let texts = vec!["a b c d e f g h i j".to_string()];
        // Cap of 6 leaves room for only 2 corpus words after the specials.
        let tok = store.load_or_build("source", &texts, 6).unwrap();

        assert_eq!(tok.get_vocab_size(false), 6);
    }
}
