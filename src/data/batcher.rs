// ============================================================
// Layer 4 — VQA Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<VqaSample> into
// tensors for one forward pass.
//
// Questions have different lengths, so they are padded here, to
// the longest question in *this* batch rather than a global
// maximum:
//
//   [4, 9, 2]          [4, 9, 2, 0, 0]
//   [7, 1, 3, 3, 8] →  [7, 1, 3, 3, 8]     lengths [3, 5]
//
// The true lengths travel with the batch so both question
// encoders can ignore the padded tail.
//
// Image features are stacked and reshaped to [n, C, H, W].
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::VqaSample;
use crate::ml::init::PADDING_TOKEN;

// ─── VqaBatch ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct VqaBatch<B: Backend> {
    /// Image feature grids, shape [batch_size, C, H, W]
    pub features: Tensor<B, 4>,

    /// Padded token ids, shape [batch_size, max_len]
    pub questions: Tensor<B, 2, Int>,

    /// True question lengths, shape [batch_size], all ≥ 1
    pub lengths: Tensor<B, 1, Int>,

    /// Annotator counts per answer, shape [batch_size, max_answers]
    pub answers: Tensor<B, 2>,
}

// ─── Padding ──────────────────────────────────────────────────────────────────
/// Questions padded to a common width, flattened row-major.
#[derive(Debug, PartialEq)]
pub struct PaddedQuestions {
    pub ids:     Vec<i32>,
    pub lengths: Vec<i32>,
    pub width:   usize,
}

pub fn pad_questions<'a>(questions: impl IntoIterator<Item = &'a [u32]>) -> PaddedQuestions {
    let questions: Vec<&[u32]> = questions.into_iter().collect();
    let width = questions.iter().map(|q| q.len()).max().unwrap_or(0).max(1);

    let mut ids = Vec::with_capacity(questions.len() * width);
    for q in &questions {
        ids.extend(q.iter().map(|&t| t as i32));
        ids.extend(std::iter::repeat(PADDING_TOKEN as i32).take(width - q.len()));
    }

    PaddedQuestions {
        ids,
        lengths: questions.iter().map(|q| q.len() as i32).collect(),
        width,
    }
}

// ─── VqaBatcher ───────────────────────────────────────────────────────────────
/// Holds the feature grid shape [C, H, W] needed to un-flatten images.
#[derive(Clone, Debug)]
pub struct VqaBatcher {
    feature_shape: [usize; 3],
}

impl VqaBatcher {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self { feature_shape: [channels, height, width] }
    }
}

impl<B: Backend> Batcher<B, VqaSample, VqaBatch<B>> for VqaBatcher {
    fn batch(&self, items: Vec<VqaSample>, device: &B::Device) -> VqaBatch<B> {
        let batch_size = items.len();
        let [c, h, w]  = self.feature_shape;
        let n_answers  = items.first().map(|s| s.answers.len()).unwrap_or(0);

        let padded = pad_questions(items.iter().map(|s| s.question.as_slice()));

        let features: Vec<f32> = items.iter().flat_map(|s| s.features.iter().copied()).collect();
        let answers:  Vec<f32> = items.iter().flat_map(|s| s.answers.iter().copied()).collect();

        let features = Tensor::<B, 1>::from_floats(features.as_slice(), device)
            .reshape([batch_size, c, h, w]);

        let questions = Tensor::<B, 1, Int>::from_ints(padded.ids.as_slice(), device)
            .reshape([batch_size, padded.width]);

        let lengths = Tensor::<B, 1, Int>::from_ints(padded.lengths.as_slice(), device);

        let answers = Tensor::<B, 1>::from_floats(answers.as_slice(), device)
            .reshape([batch_size, n_answers]);

        VqaBatch { features, questions, lengths, answers }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn sample(question: Vec<u32>, fill: f32) -> VqaSample {
        VqaSample {
            features: vec![fill; 2 * 2 * 2],
            question,
            answers:  vec![0.0, 3.0, 7.0],
        }
    }

    #[test]
    fn test_pads_to_longest_in_batch() {
        let padded = pad_questions([[4u32, 9, 2].as_slice(), [7u32, 1, 3, 3, 8].as_slice()]);
        assert_eq!(padded.width, 5);
        assert_eq!(padded.lengths, vec![3, 5]);
        assert_eq!(padded.ids, vec![4, 9, 2, 0, 0, 7, 1, 3, 3, 8]);
    }

    #[test]
    fn test_equal_lengths_need_no_padding() {
        let padded = pad_questions([[1u32, 2].as_slice(), [3u32, 4].as_slice()]);
        assert_eq!(padded.width, 2);
        assert!(!padded.ids.contains(&0));
    }

    #[test]
    fn test_batch_shapes() {
        let device  = Default::default();
        let batcher = VqaBatcher::new(2, 2, 2);
        let items   = vec![sample(vec![5], 1.0), sample(vec![1, 2, 3, 4], 2.0), sample(vec![6, 7], 3.0)];

        let batch: VqaBatch<TestBackend> = batcher.batch(items, &device);
        assert_eq!(batch.features.dims(),  [3, 2, 2, 2]);
        assert_eq!(batch.questions.dims(), [3, 4]);
        assert_eq!(batch.answers.dims(),   [3, 3]);

        let lengths: Vec<i64> = batch.lengths.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(lengths, vec![1, 4, 2]);
    }

    #[test]
    fn test_features_keep_sample_order() {
        let device  = Default::default();
        let batcher = VqaBatcher::new(2, 2, 2);
        let items   = vec![sample(vec![1], 1.0), sample(vec![1], 2.0)];

        let batch: VqaBatch<TestBackend> = batcher.batch(items, &device);
        let per_sample: Vec<f32> = batch.features.sum_dim(3).sum_dim(2).sum_dim(1)
            .into_data().to_vec().unwrap();
        assert_eq!(per_sample, vec![8.0, 16.0]);
    }
}
