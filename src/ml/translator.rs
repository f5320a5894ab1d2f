// ============================================================
// Layer 5 — Translator (inference)
// ============================================================
// Loads a trained checkpoint and translates one sentence at a
// time with greedy decoding: start from <sos>, feed the argmax
// back in at every step, stop at <eos> or the length cap. This
// is the teacher-forcing-ratio-0 path of the training loop,
// restated for the case where no target sequence exists.

use anyhow::Result;
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::infra::checkpoint::CheckpointManager;
use crate::infra::vocab_store::{EOS_ID, SOS_ID};
use crate::ml::gru::{GruSeq2Seq, GruSeq2SeqConfig};
use crate::ml::lstm::{LstmSeq2Seq, LstmSeq2SeqConfig};
use crate::ml::seq2seq::{Decoder, Encoder};
use crate::application::train_use_case::ModelArch;

type InferBackend = burn::backend::Wgpu;

/// The trained weights, whichever variant the checkpoint holds.
enum LoadedModel {
    Gru(GruSeq2Seq<InferBackend>),
    Lstm(LstmSeq2Seq<InferBackend>),
}

pub struct Translator {
    model:   LoadedModel,
    max_len: usize,
    device:  burn::backend::wgpu::WgpuDevice,
}

impl Translator {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        // Dropout 0 — inference is deterministic given the weights.
        let model = match cfg.arch {
            ModelArch::Gru => {
                let model = GruSeq2SeqConfig::new(
                    cfg.src_vocab_size, cfg.trg_vocab_size,
                    cfg.emb_dim, cfg.hid_dim, 0.0,
                )
                .init::<InferBackend>(&device);
                LoadedModel::Gru(ckpt_manager.load_model(model, &device)?)
            }
            ModelArch::Lstm => {
                let model = LstmSeq2SeqConfig::new(
                    cfg.src_vocab_size, cfg.trg_vocab_size,
                    cfg.emb_dim, cfg.hid_dim, cfg.num_layers, 0.0,
                )
                .init::<InferBackend>(&device);
                LoadedModel::Lstm(ckpt_manager.load_model(model, &device)?)
            }
        };

        tracing::info!("Model loaded from checkpoint ({:?})", cfg.arch);
        Ok(Self { model, max_len: cfg.max_len, device })
    }

    /// Translate one source sentence into target-language text.
    pub fn translate(
        &self,
        sentence:  &str,
        src_vocab: &Tokenizer,
        trg_vocab: &Tokenizer,
    ) -> Result<String> {
        let enc = src_vocab
            .encode(sentence, false)
            .map_err(|e| anyhow::anyhow!("Source tokenisation error: {e}"))?;

        let mut ids: Vec<i32> = vec![SOS_ID as i32];
        ids.extend(enc.get_ids().iter().map(|&x| x as i32));
        ids.push(EOS_ID as i32);

        let source = Tensor::<InferBackend, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, ids.len()]);

        let out_ids = match &self.model {
            LoadedModel::Gru(m)  => greedy_decode(&m.encoder, &m.decoder, source, self.max_len, &self.device),
            LoadedModel::Lstm(m) => greedy_decode(&m.encoder, &m.decoder, source, self.max_len, &self.device),
        };

        let text = trg_vocab
            .decode(&out_ids, true)
            .map_err(|e| anyhow::anyhow!("Target decode error: {e}"))?;

        Ok(text.trim().to_string())
    }
}

/// Greedy autoregressive decode for a single sentence (batch of one).
fn greedy_decode<B, E, D>(
    encoder: &E,
    decoder: &D,
    source:  Tensor<B, 2, Int>,
    max_len: usize,
    device:  &B::Device,
) -> Vec<u32>
where
    B: Backend,
    E: Encoder<B>,
    D: Decoder<B, State = E::State>,
{
    let mut state = encoder.encode(source);
    let mut input = Tensor::<B, 1, Int>::from_ints([SOS_ID as i32].as_slice(), device);
    let mut out   = Vec::new();

    for _ in 0..max_len {
        let (scores, next_state) = decoder.step(input, state);
        state = next_state;

        let token: i64 = scores.argmax(1).reshape([1]).into_scalar().elem();
        if token as usize == EOS_ID {
            break;
        }
        out.push(token as u32);

        input = Tensor::<B, 1, Int>::from_ints([token as i32].as_slice(), device);
    }

    out
}
