// ============================================================
// Layer 5 — Recurrent Cells
// ============================================================
// Single-step GRU and LSTM cells built from Burn Linear layers.
//
// Why cells instead of whole-sequence RNN modules?
//   The decoder must run one timestep at a time, because the
//   input of step t depends on the output of step t-1 (either
//   the ground-truth token or the model's own argmax). A cell
//   with signature (input, state) → state' gives the driver
//   exactly that granularity; the encoder simply folds the same
//   cell over the source sequence.
//
// Gate layout:
//   Both projections produce all gates in one matmul and the
//   result is sliced into per-gate chunks — one Linear of width
//   3*hidden (GRU) or 4*hidden (LSTM) instead of 3 or 4 separate
//   layers.
//
// Reference: Cho et al. (2014) GRU, Hochreiter & Schmidhuber (1997) LSTM
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};

// ─── GRU cell ─────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct GruCellConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
}

impl GruCellConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GruCell<B> {
        GruCell {
            // Gate order in both projections: reset | update | candidate
            input_proj:  LinearConfig::new(self.d_input, 3 * self.d_hidden).init(device),
            hidden_proj: LinearConfig::new(self.d_hidden, 3 * self.d_hidden).init(device),
            d_hidden:    self.d_hidden,
        }
    }
}

/// One GRU timestep: (input [batch, d_input], hidden [batch, d_hidden])
/// → new hidden [batch, d_hidden].
#[derive(Module, Debug)]
pub struct GruCell<B: Backend> {
    input_proj:  Linear<B>,
    hidden_proj: Linear<B>,
    d_hidden:    usize,
}

impl<B: Backend> GruCell<B> {
    pub fn forward(&self, input: Tensor<B, 2>, hidden: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch_size, _] = hidden.dims();
        let d = self.d_hidden;

        let gi = self.input_proj.forward(input);
        let gh = self.hidden_proj.forward(hidden.clone());

        let gate = |t: &Tensor<B, 2>, k: usize| {
            t.clone().slice([0..batch_size, k * d..(k + 1) * d])
        };

        let reset     = sigmoid(gate(&gi, 0) + gate(&gh, 0));
        let update    = sigmoid(gate(&gi, 1) + gate(&gh, 1));
        let candidate = (gate(&gi, 2) + reset * gate(&gh, 2)).tanh();

        // h' = (1 - z) * n + z * h, written as n + z * (h - n)
        candidate.clone() + update * (hidden - candidate)
    }
}

// ─── LSTM cell ────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct LstmCellConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
}

impl LstmCellConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmCell<B> {
        LstmCell {
            // Gate order: input | forget | cell-candidate | output
            input_proj:  LinearConfig::new(self.d_input, 4 * self.d_hidden).init(device),
            hidden_proj: LinearConfig::new(self.d_hidden, 4 * self.d_hidden).init(device),
            d_hidden:    self.d_hidden,
        }
    }
}

/// One LSTM timestep. Hidden and cell state are threaded together —
/// callers must never update one without the other.
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    input_proj:  Linear<B>,
    hidden_proj: Linear<B>,
    d_hidden:    usize,
}

impl<B: Backend> LstmCell<B> {
    /// (input, hidden, cell) → (hidden', cell')
    pub fn forward(
        &self,
        input:  Tensor<B, 2>,
        hidden: Tensor<B, 2>,
        cell:   Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, _] = hidden.dims();
        let d = self.d_hidden;

        let gates = self.input_proj.forward(input) + self.hidden_proj.forward(hidden);

        let gate = |k: usize| {
            gates.clone().slice([0..batch_size, k * d..(k + 1) * d])
        };

        let input_gate  = sigmoid(gate(0));
        let forget_gate = sigmoid(gate(1));
        let cell_cand   = gate(2).tanh();
        let output_gate = sigmoid(gate(3));

        let cell   = forget_gate * cell + input_gate * cell_cand;
        let hidden = output_gate * cell.clone().tanh();

        (hidden, cell)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_gru_cell_output_shape() {
        let device = Default::default();
        let cell: GruCell<TestBackend> = GruCellConfig::new(6, 4).init(&device);

        let input  = Tensor::<TestBackend, 2>::zeros([2, 6], &device);
        let hidden = Tensor::<TestBackend, 2>::zeros([2, 4], &device);

        let next = cell.forward(input, hidden);
        assert_eq!(next.dims(), [2, 4]);
    }

    #[test]
    fn test_gru_cell_is_deterministic() {
        let device = Default::default();
        let cell: GruCell<TestBackend> = GruCellConfig::new(3, 5).init(&device);

        let input  = Tensor::<TestBackend, 2>::ones([1, 3], &device);
        let hidden = Tensor::<TestBackend, 2>::ones([1, 5], &device);

        let a = cell.forward(input.clone(), hidden.clone());
        let b = cell.forward(input, hidden);

        assert_eq!(
            a.into_data().to_vec::<f32>().unwrap(),
            b.into_data().to_vec::<f32>().unwrap(),
        );
    }

    #[test]
    fn test_lstm_cell_threads_both_states() {
        let device = Default::default();
        let cell: LstmCell<TestBackend> = LstmCellConfig::new(4, 4).init(&device);

        let input = Tensor::<TestBackend, 2>::ones([3, 4], &device);
        let h     = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
        let c     = Tensor::<TestBackend, 2>::zeros([3, 4], &device);

        let (h1, c1) = cell.forward(input, h, c);
        assert_eq!(h1.dims(), [3, 4]);
        assert_eq!(c1.dims(), [3, 4]);

        // All values stay finite from a zero state.
        for v in h1.into_data().to_vec::<f32>().unwrap() {
            assert!(v.is_finite());
        }
    }
}
