// ============================================================
// Layer 2 — PlotUseCase
// ============================================================
// Compares runs by validation accuracy:
//
//   Step 1: Load each run_log.json           (Layer 6 - infra)
//   Step 2: Average batches → one point/epoch
//   Step 3: Draw one labelled line per run   (Layer 6 - infra)
//
// Every run log is paired with the label it is drawn under, so
// the legend never depends on file names or directory order.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::domain::traits::Persistable;
use crate::infra::{
    metrics::{epoch_means, RunLog},
    plot::{plot_accuracy, AccuracySeries},
};

/// A run log and the label it is plotted under.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledRun {
    pub label: String,
    pub path:  String,
}

impl std::str::FromStr for LabelledRun {
    type Err = String;

    /// Parses `LABEL=PATH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((label, path)) if !label.trim().is_empty() && !path.trim().is_empty() => Ok(Self {
                label: label.trim().to_string(),
                path:  path.trim().to_string(),
            }),
            _ => Err(format!("expected LABEL=PATH, got '{s}'")),
        }
    }
}

pub struct PlotUseCase {
    runs:   Vec<LabelledRun>,
    output: PathBuf,
}

impl PlotUseCase {
    pub fn new(runs: Vec<LabelledRun>, output: impl Into<PathBuf>) -> Self {
        Self { runs, output: output.into() }
    }

    /// Per-epoch mean validation accuracy for every run, in input order.
    pub fn load_series(&self) -> Result<Vec<AccuracySeries>> {
        self.runs
            .iter()
            .map(|run| {
                let log = RunLog::load(&run.path)?;
                tracing::debug!("'{}': {} epochs from {}", run.label, log.epochs(), run.path);
                Ok(AccuracySeries::new(run.label.clone(), epoch_means(&log.tracker.val_acc)))
            })
            .collect()
    }

    pub fn execute(&self) -> Result<()> {
        if self.runs.is_empty() {
            bail!("Give at least one --run LABEL=PATH");
        }
        let series = self.load_series()?;
        plot_accuracy(&series, &self.output)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn write_log(path: &std::path::Path, name: &str, epochs: usize, samples: usize) {
        let mut log = RunLog::new(name);
        for e in 0..epochs {
            let acc = 0.2 + e as f32 * 0.005;
            log.push_epoch(vec![1.0; samples], vec![acc; samples], vec![acc; samples]);
        }
        log.save(path.to_str().unwrap()).unwrap();
    }

    #[test]
    fn test_parse_labelled_run() {
        let run: LabelledRun = "lstm+cnn=runs/a/run_log.json".parse().unwrap();
        assert_eq!(run.label, "lstm+cnn");
        assert_eq!(run.path, "runs/a/run_log.json");

        assert!("runs/a/run_log.json".parse::<LabelledRun>().is_err());
        assert!("=runs/a".parse::<LabelledRun>().is_err());
    }

    #[test]
    fn test_two_runs_give_fifty_points_each() {
        let dir = tempfile::tempdir().unwrap();
        let a   = dir.path().join("a.json");
        let b   = dir.path().join("b.json");
        write_log(&a, "a", 50, 4);
        write_log(&b, "b", 50, 9);

        let use_case = PlotUseCase::new(
            vec![
                LabelledRun { label: "first".into(),  path: a.to_string_lossy().into_owned() },
                LabelledRun { label: "second".into(), path: b.to_string_lossy().into_owned() },
            ],
            dir.path().join("val_acc.svg"),
        );

        let series = use_case.load_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "first");
        assert_eq!(series[1].label, "second");
        assert!(series.iter().all(|s| s.points.len() == 50));

        use_case.execute().unwrap();
        assert!(dir.path().join("val_acc.svg").exists());
    }

    #[test]
    fn test_missing_log_fails() {
        let use_case = PlotUseCase::new(
            vec![LabelledRun { label: "x".into(), path: "/no/such/log.json".into() }],
            "unused.svg",
        );
        assert!(use_case.execute().is_err());
    }
}
