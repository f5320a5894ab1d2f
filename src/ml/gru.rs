// ============================================================
// Layer 5 — GRU Variant (context-vector model)
// ============================================================
// Single-layer GRU encoder and decoder in the style of
// Cho et al. (2014). The encoder's final hidden state doubles as
// a context vector that is held fixed for the whole decode loop:
//
//   - every decoder step consumes concat(embedding, context)
//   - the score head reads concat(embedding, hidden', context),
//     not the hidden state alone
//
// The context is carried inside GruState next to the mutable
// hidden state; the driver hands the state around opaquely and
// the decoder moves the context through unchanged.
//
// Reference: Cho et al. (2014) Learning Phrase Representations
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
};
use rand::Rng;

use crate::ml::cell::{GruCell, GruCellConfig};
use crate::ml::seq2seq::{decode_sequence, Decoder, Encoder, TranslationModel};

#[derive(Config, Debug)]
pub struct GruSeq2SeqConfig {
    pub src_vocab_size: usize,
    pub trg_vocab_size: usize,
    pub emb_dim:        usize,
    pub hid_dim:        usize,
    pub dropout:        f64,
}

impl GruSeq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GruSeq2Seq<B> {
        let encoder = GruEncoder {
            embedding: EmbeddingConfig::new(self.src_vocab_size, self.emb_dim).init(device),
            rnn:       GruCellConfig::new(self.emb_dim, self.hid_dim).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
            hid_dim:   self.hid_dim,
        };
        let decoder = GruDecoder {
            embedding: EmbeddingConfig::new(self.trg_vocab_size, self.emb_dim).init(device),
            // Step input is the embedding with the context glued on.
            rnn:       GruCellConfig::new(self.emb_dim + self.hid_dim, self.hid_dim).init(device),
            // Scores come from embedding + new hidden + context.
            fc_out:    LinearConfig::new(self.emb_dim + 2 * self.hid_dim, self.trg_vocab_size)
                .init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
        };
        GruSeq2Seq {
            encoder,
            decoder,
            trg_vocab_size: self.trg_vocab_size,
        }
    }
}

/// Recurrent state of the GRU variant. `hidden` is rewritten at every
/// decode step; `context` is the encoder's final state and never changes
/// within one forward pass.
#[derive(Debug, Clone)]
pub struct GruState<B: Backend> {
    pub hidden:  Tensor<B, 2>,
    pub context: Tensor<B, 2>,
}

#[derive(Module, Debug)]
pub struct GruEncoder<B: Backend> {
    embedding: Embedding<B>,
    rnn:       GruCell<B>,
    dropout:   Dropout,
    hid_dim:   usize,
}

impl<B: Backend> Encoder<B> for GruEncoder<B> {
    type State = GruState<B>;

    fn encode(&self, source: Tensor<B, 2, Int>) -> GruState<B> {
        let [batch_size, src_len] = source.dims();
        let device = source.device();

        let embedded = self.dropout.forward(self.embedding.forward(source));
        let [_, _, emb_dim] = embedded.dims();

        let mut hidden = Tensor::zeros([batch_size, self.hid_dim], &device);
        for t in 0..src_len {
            let x = embedded
                .clone()
                .slice([0..batch_size, t..t + 1, 0..emb_dim])
                .reshape([batch_size, emb_dim]);
            hidden = self.rnn.forward(x, hidden);
        }

        GruState {
            context: hidden.clone(),
            hidden,
        }
    }
}

#[derive(Module, Debug)]
pub struct GruDecoder<B: Backend> {
    embedding: Embedding<B>,
    rnn:       GruCell<B>,
    fc_out:    Linear<B>,
    dropout:   Dropout,
}

impl<B: Backend> Decoder<B> for GruDecoder<B> {
    type State = GruState<B>;

    fn step(&self, token: Tensor<B, 1, Int>, state: GruState<B>) -> (Tensor<B, 2>, GruState<B>) {
        let GruState { hidden, context } = state;
        let [batch_size] = token.dims();

        let embedded = self
            .dropout
            .forward(self.embedding.forward(token.reshape([batch_size, 1])));
        let [_, _, emb_dim] = embedded.dims();
        let embedded = embedded.reshape([batch_size, emb_dim]);

        let rnn_input = Tensor::cat(vec![embedded.clone(), context.clone()], 1);
        let hidden = self.rnn.forward(rnn_input, hidden);

        let features = Tensor::cat(vec![embedded, hidden.clone(), context.clone()], 1);
        let scores = self.fc_out.forward(features);

        (scores, GruState { hidden, context })
    }
}

/// The full GRU encoder-decoder pair.
#[derive(Module, Debug)]
pub struct GruSeq2Seq<B: Backend> {
    pub encoder:    GruEncoder<B>,
    pub decoder:    GruDecoder<B>,
    trg_vocab_size: usize,
}

impl<B: Backend> TranslationModel<B> for GruSeq2Seq<B> {
    fn forward<R: Rng>(
        &self,
        source:          Tensor<B, 2, Int>,
        target:          Tensor<B, 2, Int>,
        teacher_forcing: f64,
        rng:             &mut R,
    ) -> Tensor<B, 3> {
        decode_sequence(
            &self.encoder,
            &self.decoder,
            source,
            target,
            self.trg_vocab_size,
            teacher_forcing,
            rng,
        )
    }

    fn trg_vocab_size(&self) -> usize {
        self.trg_vocab_size
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    type TestBackend = burn::backend::NdArray;

    fn tiny_model(device: &<TestBackend as Backend>::Device) -> GruSeq2Seq<TestBackend> {
        GruSeq2SeqConfig::new(10, 12, 4, 6, 0.0).init(device)
    }

    fn int_tensor(values: &[i32], rows: usize) -> Tensor<TestBackend, 2, Int> {
        let device = Default::default();
        let cols = values.len() / rows;
        Tensor::<TestBackend, 1, Int>::from_ints(values, &device).reshape([rows, cols])
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model  = tiny_model(&device);

        let source = int_tensor(&[2, 4, 5, 3, 2, 6, 7, 3], 2);
        let target = int_tensor(&[2, 8, 9, 3, 2, 8, 9, 3], 2);
        let mut rng = StdRng::seed_from_u64(3);

        let out = model.forward(source, target, 0.5, &mut rng);
        assert_eq!(out.dims(), [2, 4, 12]);
    }

    #[test]
    fn test_context_is_constant_across_steps() {
        let device = Default::default();
        let model  = tiny_model(&device);

        let source = int_tensor(&[2, 4, 5, 3], 1);
        let state  = model.encoder.encode(source);
        let original: Vec<f32> = state.context.clone().into_data().to_vec().unwrap();

        let token = Tensor::<TestBackend, 1, Int>::from_ints([8].as_slice(), &device);
        let (_, state) = model.decoder.step(token.clone(), state);
        let (_, state) = model.decoder.step(token, state);

        let after: Vec<f32> = state.context.into_data().to_vec().unwrap();
        assert_eq!(original, after);
    }

    #[test]
    fn test_encoder_state_starts_as_context() {
        let device = Default::default();
        let model  = tiny_model(&device);

        let source = int_tensor(&[2, 4, 3], 1);
        let state  = model.encoder.encode(source);

        assert_eq!(state.hidden.dims(), [1, 6]);
        assert_eq!(
            state.hidden.into_data().to_vec::<f32>().unwrap(),
            state.context.into_data().to_vec::<f32>().unwrap(),
        );
    }
}
