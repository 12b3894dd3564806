// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer works against these traits, not the
// concrete loaders or the Burn-backed inferencer, so a new
// record format or model backend only needs a new impl.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::{prediction::Prediction, record::QuestionRecord};

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load question records.
///
/// Implementations:
///   - JsonlLoader → one JSON record per line
pub trait RecordSource {
    fn load_all(&self) -> Result<Vec<QuestionRecord>>;
}

// ─── AnswerPredictor ──────────────────────────────────────────────────────────
/// Any component that can rank answers for a question about an image.
///
/// Implementations:
///   - Inferencer → runs the trained VqaNet
pub trait AnswerPredictor {
    /// `features` is the flattened C·H·W feature grid of the image.
    /// Returns the `top_k` answers, most probable first.
    fn predict(&self, features: &[f32], question: &str, top_k: usize) -> Result<Vec<Prediction>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - Vocabulary → question and answer index maps (vocab.json)
///   - RunLog     → per-epoch loss / accuracy history
pub trait Persistable: Sized {
    fn save(&self, path: &str) -> Result<()>;

    fn load(path: &str) -> Result<Self>;
}
