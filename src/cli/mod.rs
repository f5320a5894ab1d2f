// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`     — trains a model on a parallel corpus
//   2. `translate` — loads a checkpoint and translates a sentence
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, TranslateArgs};

/// The main CLI struct — clap reads the fields and generates the
/// argument parsing code via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "seq2seq-nmt",
    version = "0.1.0",
    about = "Train an encoder-decoder translation model on a parallel corpus, then translate."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// The CLI layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => Self::run_train(args),
            Commands::Translate(args) => Self::run_translate(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus in: {}", args.corpus_dir);

        // Convert CLI args → application config (keeps clap out of Layer 2)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    fn run_translate(args: TranslateArgs) -> Result<()> {
        use crate::application::translate_use_case::TranslateUseCase;
        use crate::domain::traits::TranslationService;

        let use_case = TranslateUseCase::new(args.checkpoint_dir.clone())?;

        let translation = use_case.translate(&args.sentence)?;
        println!("\nTranslation: {}", translation);
        Ok(())
    }
}
