// ============================================================
// Layer 4 — JSON Lines Record Loader
// ============================================================
// Loads QuestionRecords from a .jsonl file: one JSON object per
// line, e.g.
//
//   {"question_id": 1, "question": "what color is the cat?",
//    "features": [0.12, 0.0, ...], "answers": ["white", ...]}
//
// Blank lines are skipped. A malformed line is an error (with its
// line number) rather than a silent skip, because a truncated
// feature vector would otherwise surface much later as a shape
// mismatch inside the batcher.
//
// Reference: serde_json documentation (from_str)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::domain::{record::QuestionRecord, traits::RecordSource};

/// Reads question records from a JSON-lines file.
/// Implements the RecordSource trait from Layer 3.
pub struct JsonlLoader {
    path: String,
}

impl JsonlLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonlLoader {
    fn load_all(&self) -> Result<Vec<QuestionRecord>> {
        let path = Path::new(&self.path);
        let file = File::open(path)
            .with_context(|| format!("Cannot open record file '{}'", self.path))?;

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("Cannot read '{}'", self.path))?;
            if line.trim().is_empty() {
                continue;
            }

            let record: QuestionRecord = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: malformed record", self.path, i + 1))?;
            records.push(record);
        }

        tracing::info!("Loaded {} records from {}", records.len(), self.path);
        Ok(records)
    }
}
