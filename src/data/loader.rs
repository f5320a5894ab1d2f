// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads a parallel corpus from a directory of .tsv files.
// Each line holds one sentence pair: source text, a tab, target
// text. Lines without exactly one tab, or with an empty side,
// are skipped with a warning — one bad line must not sink a
// whole training run.
//
// Reference: Rust Book §9 (Error Handling), §12 (I/O)

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;

/// Loads all .tsv files from a given directory.
/// Implements the PairSource trait from Layer 3.
pub struct TsvLoader {
    dir: String,
}

impl TsvLoader {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PairSource for TsvLoader {
    fn load_all(&self) -> Result<Vec<SentencePair>> {
        let dir = Path::new(&self.dir);

        // A missing directory yields an empty corpus, not a crash —
        // the caller decides whether that is fatal.
        if !dir.exists() {
            tracing::warn!(
                "Corpus directory '{}' does not exist — returning empty corpus",
                self.dir
            );
            return Ok(Vec::new());
        }

        let mut pairs = Vec::new();

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir))?
        {
            let entry = entry?;
            let path  = entry.path();

            if path.extension().and_then(|e| e.to_str()) == Some("tsv") {
                match load_single_tsv(&path) {
                    Ok(mut file_pairs) => {
                        tracing::debug!(
                            "Loaded: {} ({} pairs)",
                            path.display(),
                            file_pairs.len()
                        );
                        pairs.append(&mut file_pairs);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping '{}': {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("Successfully loaded {} sentence pairs", pairs.len());
        Ok(pairs)
    }
}

/// Parse a single .tsv file into sentence pairs.
fn load_single_tsv(path: &Path) -> Result<Vec<SentencePair>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut pairs = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(2, '\t');
        match (fields.next(), fields.next()) {
            (Some(source), Some(target))
                if !source.trim().is_empty() && !target.trim().is_empty() =>
            {
                pairs.push(SentencePair::new(source.trim(), target.trim()));
            }
            _ => {
                tracing::warn!(
                    "Skipping malformed line {} in '{}'",
                    line_no + 1,
                    path.display()
                );
            }
        }
    }

    Ok(pairs)
}
