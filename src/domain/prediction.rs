use serde::{Deserialize, Serialize};

/// One candidate answer with its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub answer:      String,
    /// Index in the answer vocabulary
    pub index:       usize,
    pub probability: f32,
}

impl Prediction {
    pub fn new(answer: impl Into<String>, index: usize, probability: f32) -> Self {
        Self { answer: answer.into(), index, probability }
    }
}
