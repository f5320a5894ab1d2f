// ============================================================
// Layer 5 — LSTM Variant (stacked layers)
// ============================================================
// Multi-layer LSTM encoder and decoder after Sutskever et al.
// (2014). The encoder folds the source sequence through a stack
// of LSTM cells and hands the per-layer (hidden, cell) pairs to
// the decoder, which threads them forward one target token at a
// time. The per-step decoder input is the token embedding alone;
// scores are read off the top layer's hidden state.
//
// Encoder and decoder are built from one config so their stack
// depth and hidden width always agree — the state hand-off is
// only valid when the shapes match layer for layer.

use burn::{
    nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
};
use rand::Rng;

use crate::ml::cell::{LstmCell, LstmCellConfig};
use crate::ml::seq2seq::{decode_sequence, Decoder, Encoder, TranslationModel};

#[derive(Config, Debug)]
pub struct LstmSeq2SeqConfig {
    pub src_vocab_size: usize,
    pub trg_vocab_size: usize,
    pub emb_dim:        usize,
    pub hid_dim:        usize,
    pub num_layers:     usize,
    pub dropout:        f64,
}

impl LstmSeq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmSeq2Seq<B> {
        let stack = |in_dim: usize| -> Vec<LstmCell<B>> {
            (0..self.num_layers)
                .map(|layer| {
                    let d_input = if layer == 0 { in_dim } else { self.hid_dim };
                    LstmCellConfig::new(d_input, self.hid_dim).init(device)
                })
                .collect()
        };

        let encoder = LstmEncoder {
            embedding: EmbeddingConfig::new(self.src_vocab_size, self.emb_dim).init(device),
            layers:    stack(self.emb_dim),
            dropout:   DropoutConfig::new(self.dropout).init(),
            hid_dim:   self.hid_dim,
        };
        let decoder = LstmDecoder {
            embedding: EmbeddingConfig::new(self.trg_vocab_size, self.emb_dim).init(device),
            layers:    stack(self.emb_dim),
            fc_out:    LinearConfig::new(self.hid_dim, self.trg_vocab_size).init(device),
            dropout:   DropoutConfig::new(self.dropout).init(),
        };

        LstmSeq2Seq {
            encoder,
            decoder,
            trg_vocab_size: self.trg_vocab_size,
        }
    }
}

/// Hidden/cell pair for one layer of the stack. The two tensors are
/// updated together or not at all.
#[derive(Debug, Clone)]
pub struct LayerState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell:   Tensor<B, 2>,
}

/// Recurrent state of the LSTM variant: one (hidden, cell) pair per layer.
#[derive(Debug, Clone)]
pub struct LstmState<B: Backend> {
    pub layers: Vec<LayerState<B>>,
}

impl<B: Backend> LstmState<B> {
    fn zeros(num_layers: usize, batch_size: usize, hid_dim: usize, device: &B::Device) -> Self {
        let layers = (0..num_layers)
            .map(|_| LayerState {
                hidden: Tensor::zeros([batch_size, hid_dim], device),
                cell:   Tensor::zeros([batch_size, hid_dim], device),
            })
            .collect();
        Self { layers }
    }
}

/// Advance the whole stack by one timestep. The input of layer i is the
/// hidden output of layer i-1 at the same timestep, with dropout applied
/// between layers (not after the top layer).
fn stack_step<B: Backend>(
    layers:  &[LstmCell<B>],
    dropout: &Dropout,
    input:   Tensor<B, 2>,
    state:   LstmState<B>,
) -> (Tensor<B, 2>, LstmState<B>) {
    let mut x = input;
    let mut next = Vec::with_capacity(layers.len());

    for (i, (cell, layer_state)) in layers.iter().zip(state.layers).enumerate() {
        if i > 0 {
            x = dropout.forward(x);
        }
        let (h, c) = cell.forward(x, layer_state.hidden, layer_state.cell);
        next.push(LayerState { hidden: h.clone(), cell: c });
        x = h;
    }

    (x, LstmState { layers: next })
}

#[derive(Module, Debug)]
pub struct LstmEncoder<B: Backend> {
    embedding: Embedding<B>,
    layers:    Vec<LstmCell<B>>,
    dropout:   Dropout,
    hid_dim:   usize,
}

impl<B: Backend> Encoder<B> for LstmEncoder<B> {
    type State = LstmState<B>;

    fn encode(&self, source: Tensor<B, 2, Int>) -> LstmState<B> {
        let [batch_size, src_len] = source.dims();
        let device = source.device();

        let embedded = self.dropout.forward(self.embedding.forward(source));
        let [_, _, emb_dim] = embedded.dims();

        let mut state = LstmState::zeros(self.layers.len(), batch_size, self.hid_dim, &device);
        for t in 0..src_len {
            let x = embedded
                .clone()
                .slice([0..batch_size, t..t + 1, 0..emb_dim])
                .reshape([batch_size, emb_dim]);
            let (_, next) = stack_step(&self.layers, &self.dropout, x, state);
            state = next;
        }

        state
    }
}

#[derive(Module, Debug)]
pub struct LstmDecoder<B: Backend> {
    embedding: Embedding<B>,
    layers:    Vec<LstmCell<B>>,
    fc_out:    Linear<B>,
    dropout:   Dropout,
}

impl<B: Backend> Decoder<B> for LstmDecoder<B> {
    type State = LstmState<B>;

    fn step(&self, token: Tensor<B, 1, Int>, state: LstmState<B>) -> (Tensor<B, 2>, LstmState<B>) {
        let [batch_size] = token.dims();

        let embedded = self
            .dropout
            .forward(self.embedding.forward(token.reshape([batch_size, 1])));
        let [_, _, emb_dim] = embedded.dims();
        let embedded = embedded.reshape([batch_size, emb_dim]);

        let (top_hidden, state) = stack_step(&self.layers, &self.dropout, embedded, state);
        let scores = self.fc_out.forward(top_hidden);

        (scores, state)
    }
}

/// The full LSTM encoder-decoder pair.
#[derive(Module, Debug)]
pub struct LstmSeq2Seq<B: Backend> {
    pub encoder:    LstmEncoder<B>,
    pub decoder:    LstmDecoder<B>,
    trg_vocab_size: usize,
}

impl<B: Backend> TranslationModel<B> for LstmSeq2Seq<B> {
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

    fn int_tensor(values: &[i32], rows: usize) -> Tensor<TestBackend, 2, Int> {
        let device = Default::default();
        let cols = values.len() / rows;
        Tensor::<TestBackend, 1, Int>::from_ints(values, &device).reshape([rows, cols])
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: LstmSeq2Seq<TestBackend> =
            LstmSeq2SeqConfig::new(10, 12, 4, 6, 2, 0.0).init(&device);

        let source = int_tensor(&[2, 4, 5, 6, 3, 2, 7, 8, 9, 3], 2);
        let target = int_tensor(&[2, 8, 9, 3, 2, 9, 8, 3], 2);
        let mut rng = StdRng::seed_from_u64(11);

        let out = model.forward(source, target, 1.0, &mut rng);
        assert_eq!(out.dims(), [2, 4, 12]);
    }

    #[test]
    fn test_encoder_produces_state_per_layer() {
        let device = Default::default();
        let model: LstmSeq2Seq<TestBackend> =
            LstmSeq2SeqConfig::new(10, 12, 4, 6, 3, 0.0).init(&device);

        let state = model.encoder.encode(int_tensor(&[2, 4, 5, 3], 1));

        assert_eq!(state.layers.len(), 3);
        for layer in &state.layers {
            assert_eq!(layer.hidden.dims(), [1, 6]);
            assert_eq!(layer.cell.dims(), [1, 6]);
        }
    }

    #[test]
    fn test_decoder_threads_state_as_a_unit() {
        let device = Default::default();
        let model: LstmSeq2Seq<TestBackend> =
            LstmSeq2SeqConfig::new(10, 12, 4, 6, 2, 0.0).init(&device);

        let state = model.encoder.encode(int_tensor(&[2, 4, 5, 3], 1));
        let token = Tensor::<TestBackend, 1, Int>::from_ints([8].as_slice(), &device);

        let (scores, next) = model.decoder.step(token, state);
        assert_eq!(scores.dims(), [1, 12]);
        assert_eq!(next.layers.len(), 2);
    }
}
