// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `translate`, and all
// their configurable flags. clap's derive macros generate the
// help text, error messages, and type conversions.

use clap::{Args, Subcommand};

use crate::application::train_use_case::{ModelArch, TrainConfig};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a translation model on a parallel corpus
    Train(TrainArgs),

    /// Translate a sentence using a trained checkpoint
    Translate(TranslateArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing .tsv corpus files (source \t target per line)
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory to save model checkpoints and vocabularies
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Which encoder-decoder variant to train
    #[arg(long, value_enum, default_value_t = ModelArch::Gru)]
    pub arch: ModelArch,

    /// Maximum tokens per sequence, <sos> and <eos> included;
    /// longer pairs are dropped
    #[arg(long, default_value_t = 32)]
    pub max_len: usize,

    /// Number of sentence pairs processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Token embedding dimension (both languages)
    #[arg(long, default_value_t = 256)]
    pub emb_dim: usize,

    /// Recurrent hidden state dimension
    #[arg(long, default_value_t = 512)]
    pub hid_dim: usize,

    /// Number of stacked recurrent layers (LSTM variant only;
    /// the GRU variant is single-layer by design)
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Dropout probability on embeddings and between LSTM layers
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Maximum source vocabulary size, special tokens included
    #[arg(long, default_value_t = 10_000)]
    pub src_vocab_size: usize,

    /// Maximum target vocabulary size, special tokens included
    #[arg(long, default_value_t = 10_000)]
    pub trg_vocab_size: usize,

    /// Probability of feeding the ground-truth token instead of the
    /// model's own prediction at each decode step (validation always
    /// uses 0)
    #[arg(long, default_value_t = 0.5)]
    pub teacher_forcing: f64,

    /// Gradient norm clipping threshold
    #[arg(long, default_value_t = 1.0)]
    pub clip_norm: f32,

    /// RNG seed for shuffling and teacher-forcing draws
    #[arg(long, default_value_t = 1234)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 — the
/// application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir:      a.corpus_dir,
            checkpoint_dir:  a.checkpoint_dir,
            arch:            a.arch,
            max_len:         a.max_len,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            emb_dim:         a.emb_dim,
            hid_dim:         a.hid_dim,
            num_layers:      a.num_layers,
            dropout:         a.dropout,
            src_vocab_size:  a.src_vocab_size,
            trg_vocab_size:  a.trg_vocab_size,
            teacher_forcing: a.teacher_forcing,
            clip_norm:       a.clip_norm,
            seed:            a.seed,
        }
    }
}

/// All arguments for the `translate` command
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// The source-language sentence to translate
    #[arg(long)]
    pub sentence: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
