// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the parallel corpus      (Layer 4 - data)
//   Step 2: Clean both sides              (Layer 4 - data)
//   Step 3: Build vocabularies            (Layer 6 - infra)
//   Step 4: Build training samples        (this file)
//   Step 5: Split train/validation        (Layer 4 - data)
//   Step 6: Build datasets                (Layer 4 - data)
//   Step 7: Save config                   (Layer 6 - infra)
//   Step 8: Run training loop             (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use clap::ValueEnum;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::{
    dataset::{TranslationDataset, TranslationSample},
    loader::TsvLoader,
    preprocessor::Preprocessor,
    splitter::split_train_val,
};
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    vocab_store::{VocabStore, EOS_ID, PAD_ID, SOS_ID},
};
use crate::ml::trainer::run_training;

/// Which encoder-decoder variant to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelArch {
    /// Single-layer GRU with a fixed context vector (Cho et al. 2014)
    Gru,
    /// Stacked LSTM (Sutskever et al. 2014)
    Lstm,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can be
// saved beside the checkpoints and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir:      String,
    pub checkpoint_dir:  String,
    pub arch:            ModelArch,
    pub max_len:         usize,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub emb_dim:         usize,
    pub hid_dim:         usize,
    pub num_layers:      usize,
    pub dropout:         f64,
    pub src_vocab_size:  usize,
    pub trg_vocab_size:  usize,
    pub teacher_forcing: f64,
    pub clip_norm:       f32,
    pub seed:            u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir:      "data/corpus".to_string(),
            checkpoint_dir:  "checkpoints".to_string(),
            arch:            ModelArch::Gru,
            max_len:         32,
            batch_size:      32,
            epochs:          10,
            lr:              1e-3,
            emb_dim:         256,
            hid_dim:         512,
            num_layers:      2,
            dropout:         0.5,
            src_vocab_size:  10_000,
            trg_vocab_size:  10_000,
            teacher_forcing: 0.5,
            clip_norm:       1.0,
            seed:            1234,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the parallel corpus ──────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.corpus_dir);
        let loader = TsvLoader::new(&cfg.corpus_dir);
        let raw_pairs = loader.load_all()?;
        if raw_pairs.is_empty() {
            bail!("No sentence pairs found in '{}'", cfg.corpus_dir);
        }
        tracing::info!("Loaded {} sentence pairs", raw_pairs.len());

        // ── Step 2: Clean both sides ──────────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let pairs: Vec<SentencePair> = raw_pairs
            .iter()
            .map(|p| SentencePair::new(preprocessor.clean(&p.source), preprocessor.clean(&p.target)))
            .collect();

        // ── Step 3: Build / load vocabularies ─────────────────────────────────
        // One word-level vocabulary per language, persisted beside the
        // checkpoints so inference uses the exact same token ids.
        let vocab_store = VocabStore::new(&cfg.checkpoint_dir);
        let src_texts: Vec<String> = pairs.iter().map(|p| p.source.clone()).collect();
        let trg_texts: Vec<String> = pairs.iter().map(|p| p.target.clone()).collect();
        let src_vocab = vocab_store.load_or_build("source", &src_texts, cfg.src_vocab_size)?;
        let trg_vocab = vocab_store.load_or_build("target", &trg_texts, cfg.trg_vocab_size)?;

        // ── Step 4: Build training samples ────────────────────────────────────
        let samples = build_samples(&pairs, &src_vocab, &trg_vocab, cfg.max_len)?;
        if samples.is_empty() {
            bail!("Every sentence pair exceeded max_len={} — nothing to train on", cfg.max_len);
        }
        tracing::info!("Built {} training samples", samples.len());

        // ── Step 5: Train / validation split (80/20) ──────────────────────────
        // Seeded from the config so the same seed reproduces the same
        // split membership run over run.
        let mut split_rng = StdRng::seed_from_u64(cfg.seed);
        let (train_samples, val_samples) = split_train_val(samples, 0.8, &mut split_rng);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );

        // ── Step 6: Build Burn datasets ───────────────────────────────────────
        let train_dataset = TranslationDataset::new(train_samples);
        let val_dataset   = TranslationDataset::new(val_samples);

        // ── Step 7: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        // ── Step 8: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, train_dataset, val_dataset, ckpt_manager)?;

        Ok(())
    }
}

// ─── Sample building ──────────────────────────────────────────────────────────
// Tokenise both sides, wrap them in <sos>/<eos>, and pad to max_len.
// Pairs that would not fit even after wrapping are dropped — truncating
// a translation would teach the model to cut sentences short.
fn build_samples(
    pairs:     &[SentencePair],
    src_vocab: &Tokenizer,
    trg_vocab: &Tokenizer,
    max_len:   usize,
) -> Result<Vec<TranslationSample>> {
    let mut samples = Vec::with_capacity(pairs.len());
    let mut dropped = 0usize;

    for pair in pairs {
        let src_enc = src_vocab
            .encode(pair.source.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Source tokenisation error: {e}"))?;
        let trg_enc = trg_vocab
            .encode(pair.target.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Target tokenisation error: {e}"))?;

        // <sos> and <eos> take two slots of the budget.
        if src_enc.get_ids().len() + 2 > max_len || trg_enc.get_ids().len() + 2 > max_len {
            dropped += 1;
            continue;
        }

        samples.push(TranslationSample {
            source_ids: wrap_and_pad(src_enc.get_ids(), max_len),
            target_ids: wrap_and_pad(trg_enc.get_ids(), max_len),
        });
    }

    if dropped > 0 {
        tracing::warn!("Dropped {dropped} pairs longer than max_len={max_len}");
    }

    Ok(samples)
}

/// [<sos>, tokens..., <eos>, <pad>...] of exactly max_len entries.
fn wrap_and_pad(ids: &[u32], max_len: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(max_len);
    out.push(SOS_ID as u32);
    out.extend_from_slice(ids);
    out.push(EOS_ID as u32);
    out.resize(max_len, PAD_ID as u32);
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_and_pad_layout() {
        let ids = wrap_and_pad(&[7, 8, 9], 8);
        assert_eq!(ids, vec![2, 7, 8, 9, 3, 0, 0, 0]);
    }

    #[test]
    fn test_build_samples_drops_long_pairs() {
        let dir = std::env::temp_dir().join("seq2seq-nmt-samples");
        let _ = std::fs::remove_dir_all(&dir);
        let store = VocabStore::new(dir.to_string_lossy().to_string());

        let texts = vec!["one two three four five six".to_string()];
        let vocab = store.load_or_build("source", &texts, 100).unwrap();

        let pairs = vec![
            SentencePair::new("one two", "one two"),
            SentencePair::new("one two three four five six", "one"),
        ];

        // max_len 6 fits "one two" + markers, but not the 6-word side.
        let samples = build_samples(&pairs, &vocab, &vocab, 6).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].source_ids.len(), 6);
        assert_eq!(samples[0].source_ids[0], SOS_ID as u32);
    }
}
