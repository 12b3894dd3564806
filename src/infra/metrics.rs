// ============================================================
// Layer 6 — Metrics and Run Log
// ============================================================
// Two records of a training run, both in the run directory:
//
//   metrics.csv   one row per epoch with the epoch means
//                 (easy to open in a spreadsheet)
//
//     epoch,train_loss,train_acc,val_loss,val_acc
//     1,4.812300,0.213000,4.501200,0.254000
//
//   run_log.json  every per-batch value, grouped by epoch:
//
//     { "name": "baseline",
//       "tracker": { "train_loss": [[...], [...]],
//                    "train_acc":  [[...], [...]],
//                    "val_acc":    [[...], [...]] } }
//
// The plot command reads run_log.json and averages each inner
// list with epoch_means to get one point per epoch.
//
// How to read the metrics:
//   - train_loss should fall every epoch
//   - val_acc rising then flattening is normal; val_acc falling
//     while train_acc keeps rising means overfitting
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::domain::traits::Persistable;

/// Epoch-level means for one row of metrics.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch:      usize,
    pub train_loss: f64,
    /// Mean VQA accuracy over training batches, in [0, 1]
    pub train_acc:  f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_acc: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }

    /// True if validation accuracy beat the previous best
    pub fn is_improvement(&self, best_val_acc: f64) -> bool {
        self.val_acc > best_val_acc
    }
}

/// Appends epoch rows to {dir}/metrics.csv.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_acc, m.val_loss, m.val_acc,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Run Log ──────────────────────────────────────────────────────────────────
/// Per-batch values, `epochs × batches`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub train_loss: Vec<Vec<f32>>,
    pub train_acc:  Vec<Vec<f32>>,
    pub val_acc:    Vec<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub name:    String,
    pub tracker: Tracker,
}

impl RunLog {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), tracker: Tracker::default() }
    }

    /// Record one finished epoch.
    pub fn push_epoch(&mut self, train_loss: Vec<f32>, train_acc: Vec<f32>, val_acc: Vec<f32>) {
        self.tracker.train_loss.push(train_loss);
        self.tracker.train_acc.push(train_acc);
        self.tracker.val_acc.push(val_acc);
    }

    pub fn epochs(&self) -> usize {
        self.tracker.val_acc.len()
    }
}

impl Persistable for RunLog {
    fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json).with_context(|| format!("Cannot write run log '{path}'"))
    }

    fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read run log '{path}'"))?;
        let log = serde_json::from_str(&json)
            .with_context(|| format!("Malformed run log '{path}'"))?;
        Ok(log)
    }
}

/// Mean of each epoch's values; an epoch with no values maps to 0.
pub fn epoch_means(series: &[Vec<f32>]) -> Vec<f32> {
    series
        .iter()
        .map(|epoch| {
            if epoch.is_empty() {
                0.0
            } else {
                epoch.iter().sum::<f32>() / epoch.len() as f32
            }
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 0.4, 2.6, 0.45);
        assert!(m.is_improvement(0.40));
        assert!(!m.is_improvement(0.50));
    }

    #[test]
    fn test_epoch_means_one_point_per_epoch() {
        let series: Vec<Vec<f32>> = (0..50).map(|e| vec![e as f32; 7]).collect();
        let means = epoch_means(&series);
        assert_eq!(means.len(), 50);
        assert_eq!(means[0], 0.0);
        assert_eq!(means[49], 49.0);
    }

    #[test]
    fn test_epoch_means_averages_batches() {
        let means = epoch_means(&[vec![0.2, 0.4, 0.6], vec![]]);
        assert!((means[0] - 0.4).abs() < 1e-6);
        assert_eq!(means[1], 0.0);
    }

    #[test]
    fn test_run_log_file_layout() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_log.json");
        let path = path.to_str().unwrap();

        let mut log = RunLog::new("baseline");
        log.push_epoch(vec![4.0, 3.5], vec![0.1, 0.2], vec![0.3]);
        log.save(path).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["name"], "baseline");
        assert_eq!(raw["tracker"]["val_acc"][0][0].as_f64().unwrap() as f32, 0.3);

        assert_eq!(RunLog::load(path).unwrap(), log);
    }

    #[test]
    fn test_csv_rows_are_appended() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_str().unwrap()).unwrap();
        logger.log(&EpochMetrics::new(1, 4.0, 0.1, 3.9, 0.2)).unwrap();
        logger.log(&EpochMetrics::new(2, 3.0, 0.2, 3.1, 0.3)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2,3.000000,"));
    }
}
