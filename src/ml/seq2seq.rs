// ============================================================
// Layer 5 — Sequence Driver
// ============================================================
// The decode loop with teacher forcing — the one piece of real
// design in this system. Everything else delegates to Burn.
//
// The driver never sees a concrete model. It depends on two
// traits that share a State type:
//
//   Encoder: encode(source)      → State
//   Decoder: step(token, State)  → (scores, State)
//
// so the GRU and LSTM variants swap without touching the loop.
// The teacher-forcing choice is plain control flow fed by an
// explicit Rng parameter — tests inject a seeded StdRng and can
// force either branch with ratio 0.0 or 1.0.
//
// Reference: Sutskever et al. (2014) Sequence to Sequence Learning
//            Williams & Zipser (1989) teacher forcing

use burn::{nn::loss::CrossEntropyLossConfig, prelude::*};
use rand::Rng;

// ─── Contracts ────────────────────────────────────────────────────────────────

/// Maps a source token batch to the initial decoder state.
pub trait Encoder<B: Backend> {
    type State;

    /// source: [batch, src_len] token indices.
    fn encode(&self, source: Tensor<B, 2, Int>) -> Self::State;
}

/// Advances the decoder by a single timestep.
pub trait Decoder<B: Backend> {
    type State;

    /// token: [batch] previous output token indices.
    /// Returns per-token scores [batch, trg_vocab] and the updated state.
    fn step(&self, token: Tensor<B, 1, Int>, state: Self::State) -> (Tensor<B, 2>, Self::State);
}

/// A full encoder-decoder pair the training loop can drive.
/// Implemented by both model variants on top of `decode_sequence`.
pub trait TranslationModel<B: Backend> {
    /// Run one encode pass plus the full decode loop.
    /// Returns scores [batch, trg_len, trg_vocab]; position 0 is a placeholder.
    fn forward<R: Rng>(
        &self,
        source:          Tensor<B, 2, Int>,
        target:          Tensor<B, 2, Int>,
        teacher_forcing: f64,
        rng:             &mut R,
    ) -> Tensor<B, 3>;

    fn trg_vocab_size(&self) -> usize;
}

// ─── Decode loop ──────────────────────────────────────────────────────────────

/// Run one encode pass followed by a step-wise decode loop over the
/// target sequence.
///
/// For each step t in 1..trg_len:
///   1. one decoder step with the current input and state
///   2. record the scores at output position t
///   3. draw a fresh coin flip: with probability `teacher_forcing`
///      the next input is the ground-truth token at t, otherwise the
///      argmax of the scores just produced
///
/// Position 0 of the output is never populated with a real prediction;
/// `sequence_loss` excludes it. Ratio 0.0 disables teacher forcing
/// (evaluation), ratio 1.0 always feeds ground truth.
///
/// # Panics
/// Mismatched source/target batch sizes or an empty target are caller
/// contract violations and panic immediately.
pub fn decode_sequence<B, E, D, R>(
    encoder:         &E,
    decoder:         &D,
    source:          Tensor<B, 2, Int>,
    target:          Tensor<B, 2, Int>,
    trg_vocab_size:  usize,
    teacher_forcing: f64,
    rng:             &mut R,
) -> Tensor<B, 3>
where
    B: Backend,
    E: Encoder<B>,
    D: Decoder<B, State = E::State>,
    R: Rng,
{
    let [src_batch, _] = source.dims();
    let [batch_size, trg_len] = target.dims();
    assert_eq!(
        src_batch, batch_size,
        "source batch size ({src_batch}) does not match target batch size ({batch_size})"
    );
    assert!(trg_len >= 1, "target sequence must contain at least the start marker");

    let device = target.device();

    let mut state = encoder.encode(source);

    // First decoder input: the <sos> column of the target batch.
    let mut input = target
        .clone()
        .slice([0..batch_size, 0..1])
        .reshape([batch_size]);

    // Position 0 is a placeholder and must be excluded from any loss.
    let mut outputs: Vec<Tensor<B, 3>> = Vec::with_capacity(trg_len);
    outputs.push(Tensor::zeros([batch_size, 1, trg_vocab_size], &device));

    for t in 1..trg_len {
        let (scores, next_state) = decoder.step(input, state);
        state = next_state;

        outputs.push(scores.clone().reshape([batch_size, 1, trg_vocab_size]));

        // Independent draw at every step — never reuse a flip.
        let feed_truth = rng.gen::<f64>() < teacher_forcing;
        input = if feed_truth {
            target
                .clone()
                .slice([0..batch_size, t..t + 1])
                .reshape([batch_size])
        } else {
            scores.argmax(1).reshape([batch_size])
        };
    }

    Tensor::cat(outputs, 1)
}

// ─── Loss ─────────────────────────────────────────────────────────────────────

/// Cross-entropy over positions 1..trg_len, ignoring the padding index.
/// Position 0 (the driver's placeholder) never enters the loss.
pub fn sequence_loss<B: Backend>(
    scores:    Tensor<B, 3>,
    target:    Tensor<B, 2, Int>,
    pad_token: usize,
) -> Tensor<B, 1> {
    let [batch_size, trg_len, vocab] = scores.dims();
    assert!(trg_len >= 2, "cannot score a target without real decode steps");

    let scores = scores
        .slice([0..batch_size, 1..trg_len, 0..vocab])
        .reshape([batch_size * (trg_len - 1), vocab]);
    let target = target
        .slice([0..batch_size, 1..trg_len])
        .reshape([batch_size * (trg_len - 1)]);

    CrossEntropyLossConfig::new()
        .with_pad_tokens(Some(vec![pad_token]))
        .init(&scores.device())
        .forward(scores, target)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::cell::RefCell;

    type TestBackend = burn::backend::NdArray;

    const VOCAB: usize = 7;

    /// Stub encoder: the state is a dummy tensor, enough to satisfy
    /// the driver's hand-off contract.
    struct StubEncoder;

    impl Encoder<TestBackend> for StubEncoder {
        type State = Tensor<TestBackend, 2>;

        fn encode(&self, source: Tensor<TestBackend, 2, Int>) -> Self::State {
            let [batch, _] = source.dims();
            Tensor::zeros([batch, 1], &source.device())
        }
    }

    /// Stub decoder that records every input it is fed and always
    /// scores token (input + 1) % VOCAB highest. With ratio 0 the
    /// driver must therefore feed it the chain sos, sos+1, sos+2, ...
    struct ChainDecoder {
        seen: RefCell<Vec<i64>>,
    }

    impl ChainDecoder {
        fn new() -> Self {
            Self { seen: RefCell::new(Vec::new()) }
        }
    }

    impl Decoder<TestBackend> for ChainDecoder {
        type State = Tensor<TestBackend, 2>;

        fn step(
            &self,
            token: Tensor<TestBackend, 1, Int>,
            state: Self::State,
        ) -> (Tensor<TestBackend, 2>, Self::State) {
            let device = state.device();
            let t: i64 = token.into_scalar().elem();
            self.seen.borrow_mut().push(t);

            let mut row = vec![0.0f32; VOCAB];
            row[((t + 1) as usize) % VOCAB] = 1.0;
            let scores = Tensor::<TestBackend, 1>::from_floats(row.as_slice(), &device)
                .reshape([1, VOCAB]);

            (scores, state)
        }
    }

    fn int_tensor(values: &[i32]) -> Tensor<TestBackend, 2, Int> {
        let device = Default::default();
        Tensor::<TestBackend, 1, Int>::from_ints(values, &device).reshape([1, values.len()])
    }

    #[test]
    fn test_full_teacher_forcing_feeds_ground_truth() {
        let source  = int_tensor(&[2, 4, 4, 4, 3]);
        let target  = int_tensor(&[2, 5, 6, 1, 3]);
        let decoder = ChainDecoder::new();
        let mut rng = StdRng::seed_from_u64(7);

        decode_sequence(&StubEncoder, &decoder, source, target, VOCAB, 1.0, &mut rng);

        // Inputs are exactly the ground-truth tokens 0..L-1.
        assert_eq!(*decoder.seen.borrow(), vec![2, 5, 6, 1]);
    }

    #[test]
    fn test_no_teacher_forcing_feeds_own_argmax() {
        let source  = int_tensor(&[2, 4, 3]);
        let target  = int_tensor(&[2, 5, 6, 1, 3]);
        let decoder = ChainDecoder::new();
        let mut rng = StdRng::seed_from_u64(7);

        decode_sequence(&StubEncoder, &decoder, source, target, VOCAB, 0.0, &mut rng);

        // Each input is the argmax of the previous step's own scores:
        // 2 → 3 → 4 → 5, regardless of the target tokens.
        assert_eq!(*decoder.seen.borrow(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_three_real_steps_for_target_length_four() {
        // Source length 5, target length 4, ratio 0 → exactly 3 decode
        // steps (t = 1, 2, 3), each consuming the previous argmax.
        let source  = int_tensor(&[2, 4, 4, 4, 3]);
        let target  = int_tensor(&[2, 5, 6, 3]);
        let decoder = ChainDecoder::new();
        let mut rng = StdRng::seed_from_u64(0);

        let out = decode_sequence(&StubEncoder, &decoder, source, target, VOCAB, 0.0, &mut rng);

        assert_eq!(decoder.seen.borrow().len(), 3);
        assert_eq!(*decoder.seen.borrow(), vec![2, 3, 4]);
        assert_eq!(out.dims(), [1, 4, VOCAB]);
    }

    #[test]
    fn test_position_zero_is_a_placeholder() {
        let source  = int_tensor(&[2, 3]);
        let target  = int_tensor(&[2, 5, 3]);
        let decoder = ChainDecoder::new();
        let mut rng = StdRng::seed_from_u64(1);

        let out = decode_sequence(&StubEncoder, &decoder, source, target, VOCAB, 0.5, &mut rng);

        let first: Vec<f32> = out
            .slice([0..1, 0..1, 0..VOCAB])
            .into_data()
            .to_vec()
            .unwrap();
        assert!(first.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let source = int_tensor(&[2, 4, 4, 3]);
        let target = int_tensor(&[2, 5, 6, 1, 4, 3]);

        let run = |seed: u64| {
            let decoder = ChainDecoder::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let out = decode_sequence(
                &StubEncoder,
                &decoder,
                source.clone(),
                target.clone(),
                VOCAB,
                0.5,
                &mut rng,
            );
            (decoder.seen.into_inner(), out.into_data().to_vec::<f32>().unwrap())
        };

        let (seen_a, out_a) = run(42);
        let (seen_b, out_b) = run(42);
        assert_eq!(seen_a, seen_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    #[should_panic(expected = "batch size")]
    fn test_batch_mismatch_fails_loudly() {
        let device = Default::default();
        let source = Tensor::<TestBackend, 2, Int>::zeros([2, 3], &device);
        let target = Tensor::<TestBackend, 2, Int>::zeros([1, 3], &device);
        let mut rng = StdRng::seed_from_u64(0);

        decode_sequence(&StubEncoder, &ChainDecoder::new(), source, target, VOCAB, 0.5, &mut rng);
    }

    #[test]
    fn test_sequence_loss_ignores_position_zero() {
        let device = Default::default();
        let target = int_tensor(&[2, 5, 3]);

        let make_scores = |pos0: f32| {
            let mut values = vec![0.1f32; 3 * VOCAB];
            for v in values.iter_mut().take(VOCAB) {
                *v = pos0; // garbage in the placeholder slot
            }
            values[VOCAB + 5]     = 3.0; // position 1 prefers token 5
            values[2 * VOCAB + 3] = 3.0; // position 2 prefers token 3
            Tensor::<TestBackend, 1>::from_floats(values.as_slice(), &device)
                .reshape([1, 3, VOCAB])
        };

        let a: f32 = sequence_loss(make_scores(0.0), target.clone(), 0)
            .into_scalar()
            .elem();
        let b: f32 = sequence_loss(make_scores(1000.0), target, 0)
            .into_scalar()
            .elem();

        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_sequence_loss_ignores_padding() {
        let device = Default::default();

        // Position 2 of the target is <pad> (id 0) — its scores must
        // not contribute to the loss.
        let target = int_tensor(&[2, 5, 0]);

        let make_scores = |pad_pos: f32| {
            let mut values = vec![0.1f32; 3 * VOCAB];
            values[VOCAB + 5] = 3.0;
            for v in values.iter_mut().skip(2 * VOCAB) {
                *v = pad_pos;
            }
            Tensor::<TestBackend, 1>::from_floats(values.as_slice(), &device)
                .reshape([1, 3, VOCAB])
        };

        let a: f32 = sequence_loss(make_scores(0.2), target.clone(), 0)
            .into_scalar()
            .elem();
        let b: f32 = sequence_loss(make_scores(7.5), target, 0)
            .into_scalar()
            .elem();

        assert!((a - b).abs() < 1e-6);
    }
}
