// ============================================================
// Layer 3 — QuestionRecord Domain Type
// ============================================================
// One training / validation example before tokenisation:
//
//   - the question text ("what color is the cat?")
//   - the image's pre-extracted feature grid, flattened in
//     channel-major order: C × H × W floats (2048 × 14 × 14)
//   - the free-form answers given by the human annotators
//     (usually 10, empty for unlabelled questions)
//
// The image features come from an external CNN (ResNet-152
// at 448×448 input) and are stored alongside the question, so
// the model never sees raw pixels.
//
// Reference: Antol et al. (2015) VQA dataset format

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Dataset question id, kept for traceability
    #[serde(default)]
    pub question_id: Option<u64>,

    /// The natural language question
    pub question: String,

    /// Flattened image feature grid [C·H·W]
    pub features: Vec<f32>,

    /// Annotator answers (may repeat; repetition is the signal)
    #[serde(default)]
    pub answers: Vec<String>,
}

impl QuestionRecord {
    pub fn new(question: impl Into<String>, features: Vec<f32>, answers: Vec<String>) -> Self {
        Self {
            question_id: None,
            question:    question.into(),
            features,
            answers,
        }
    }

    pub fn is_labelled(&self) -> bool {
        !self.answers.is_empty()
    }
}
