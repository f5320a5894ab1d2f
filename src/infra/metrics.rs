// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch, so
// learning curves can be plotted and runs compared.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average cross-entropy loss on training batches
//   - val_loss:   average cross-entropy loss on validation batches
//                 (teacher forcing off)
//   - val_acc:    fraction of non-padding target tokens predicted
//                 exactly, position 0 excluded
//
// Output file: checkpoints/metrics.csv
//
// How to read the numbers: loss should fall each epoch; val_loss
// rising while train_loss falls means overfitting; exp(loss) is
// the perplexity the training loop prints.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_acc }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger, writing the CSV header if the file
    /// doesn't exist yet (appending across runs is allowed).
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new CSV row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.val_loss, m.val_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_header_and_rows() {
        let dir = std::env::temp_dir().join("seq2seq-nmt-metrics");
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_string_lossy().to_string()).unwrap();
        logger.log(&EpochMetrics::new(1, 4.2, 4.5, 0.1)).unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("epoch,train_loss,val_loss,val_acc"));
        assert_eq!(lines.next(), Some("1,4.200000,4.500000,0.100000"));
    }
}
