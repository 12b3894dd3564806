use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded example: image features, question token ids
/// (unpadded, at least one token) and per-answer annotator counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VqaSample {
    /// Flattened [C·H·W] feature grid
    pub features: Vec<f32>,
    pub question: Vec<u32>,
    /// [max_answers] annotator counts, mostly zero
    pub answers:  Vec<f32>,
}

pub struct VqaDataset {
    samples: Vec<VqaSample>,
}

impl VqaDataset {
    pub fn new(samples: Vec<VqaSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<VqaSample> for VqaDataset {
    fn get(&self, index: usize) -> Option<VqaSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
