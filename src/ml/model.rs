use burn::{prelude::*, tensor::backend::AutodiffBackend};

use crate::ml::attention::{apply_attention, normalize_features, Attention};
use crate::ml::classifier::Classifier;
use crate::ml::config::VqaConfig;
use crate::ml::fusion::dual_gate;
use crate::ml::loss::{soft_answer_loss, vqa_accuracy};
use crate::ml::mode::Mode;
use crate::ml::text_cnn::CnnTextProcessor;
use crate::ml::text_lstm::LstmTextProcessor;

impl VqaConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> VqaNet<B> {
        let lstm_text = LstmTextProcessor::new(
            self.embedding_tokens,
            self.embedding_features,
            self.question_features,
            self.dropout,
            device,
        );
        let cnn_text = CnnTextProcessor::new(
            self.embedding_tokens,
            self.embedding_features,
            self.question_features,
            self.kernel_width,
            self.dropout,
            self.multilayer_cnn,
            device,
        );
        let attention = Attention::new(
            self.vision_features,
            self.question_features,
            self.mid_features,
            self.glimpses,
            self.dropout,
            device,
        );
        let classifier = Classifier::new(
            self.combined_features(),
            self.classifier_features,
            self.max_answers,
            self.dropout,
            device,
        );
        VqaNet { lstm_text, cnn_text, attention, classifier }
    }
}

/// Show, Ask, Attend, and Answer with a gated LSTM + CNN question encoder.
#[derive(Module, Debug)]
pub struct VqaNet<B: Backend> {
    pub lstm_text:  LstmTextProcessor<B>,
    pub cnn_text:   CnnTextProcessor<B>,
    pub attention:  Attention<B>,
    pub classifier: Classifier<B>,
}

impl<B: Backend> VqaNet<B> {
    /// v: [n, C, H, W] image features, q: [n, len] token ids,
    /// q_len: [n] true lengths → answer scores [n, max_answers]
    pub fn forward(
        &self,
        v:     Tensor<B, 4>,
        q:     Tensor<B, 2, Int>,
        q_len: Tensor<B, 1, Int>,
        mode:  Mode,
    ) -> Tensor<B, 2> {
        let q_lstm = self.lstm_text.forward(q.clone(), q_len.clone(), mode);
        let q_cnn  = self.cnn_text.forward(q, q_len, mode);
        let q      = dual_gate(q_lstm, q_cnn);

        let v = normalize_features(v);
        let a = self.attention.forward(v.clone(), q.clone(), mode);
        let v = apply_attention(v, a);

        let combined = Tensor::cat(vec![v, q], 1);
        self.classifier.forward(combined, mode)
    }

    /// Mean loss [1] and per-example VQA accuracy [n] in Mode::Eval.
    pub fn forward_eval(
        &self,
        v:       Tensor<B, 4>,
        q:       Tensor<B, 2, Int>,
        q_len:   Tensor<B, 1, Int>,
        answers: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let scores   = self.forward(v, q, q_len, Mode::Eval);
        let loss     = soft_answer_loss(scores.clone(), answers.clone());
        let accuracy = vqa_accuracy(scores, answers);
        (loss, accuracy)
    }

    /// Training-mode pass; accuracy is computed on detached scores.
    pub fn forward_loss(
        &self,
        v:       Tensor<B, 4>,
        q:       Tensor<B, 2, Int>,
        q_len:   Tensor<B, 1, Int>,
        answers: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>)
    where
        B: AutodiffBackend,
    {
        let scores   = self.forward(v, q, q_len, Mode::Train);
        let loss     = soft_answer_loss(scores.clone(), answers.clone());
        let accuracy = vqa_accuracy(scores.detach(), answers);
        (loss, accuracy)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;
    type Device      = <TestBackend as Backend>::Device;

    fn small_config() -> VqaConfig {
        VqaConfig::new(10)
            .with_max_answers(7)
            .with_embedding_features(6)
            .with_question_features(8)
            .with_vision_features(16)
            .with_image_size(96)
            .with_mid_features(12)
            .with_classifier_features(10)
    }

    fn questions(device: &Device) -> (Tensor<TestBackend, 2, Int>, Tensor<TestBackend, 1, Int>) {
        let q = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4, 5, 6, 7, 8, 0, 0], device)
            .reshape([2, 5]);
        let q_len = Tensor::<TestBackend, 1, Int>::from_ints([5, 3], device);
        (q, q_len)
    }

    #[test]
    fn test_end_to_end_published_sizes() {
        let device = Default::default();
        let model: VqaNet<TestBackend> = VqaConfig::new(10).with_max_answers(20).init(&device);

        let v = Tensor::<TestBackend, 4>::random([2, 2048, 14, 14], Distribution::Uniform(0.0, 1.0), &device);
        let (q, q_len) = questions(&device);

        let first  = model.forward(v.clone(), q.clone(), q_len.clone(), Mode::Eval);
        assert_eq!(first.dims(), [2, 20]);

        let first: Vec<f32>  = first.into_data().to_vec().unwrap();
        let second: Vec<f32> = model.forward(v, q, q_len, Mode::Eval).into_data().to_vec().unwrap();
        assert!(first.iter().all(|x| x.is_finite()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_shape_independent_of_length() {
        let device = Default::default();
        let cfg    = small_config();
        let model: VqaNet<TestBackend> = cfg.init(&device);
        let side   = cfg.output_size();

        for width in [1usize, 2, 9] {
            let ids: Vec<i32> = (0..3 * width).map(|i| (i % 9) as i32 + 1).collect();
            let q     = Tensor::<TestBackend, 1, Int>::from_ints(ids.as_slice(), &device).reshape([3, width]);
            let q_len = Tensor::<TestBackend, 1, Int>::from_ints([width as i32; 3], &device);
            let v     = Tensor::<TestBackend, 4>::ones([3, 16, side, side], &device);

            assert_eq!(model.forward(v, q, q_len, Mode::Eval).dims(), [3, 7]);
        }
    }

    #[test]
    fn test_single_layer_cnn_variant() {
        let device = Default::default();
        let cfg    = small_config().with_multilayer_cnn(false);
        let model: VqaNet<TestBackend> = cfg.init(&device);
        let side   = cfg.output_size();

        let (q, q_len) = questions(&device);
        let v = Tensor::<TestBackend, 4>::ones([2, 16, side, side], &device);
        assert_eq!(model.forward(v, q, q_len, Mode::Eval).dims(), [2, 7]);
    }

    #[test]
    fn test_forward_eval_reports_accuracy_per_example() {
        let device = Default::default();
        let cfg    = small_config();
        let model: VqaNet<TestBackend> = cfg.init(&device);
        let side   = cfg.output_size();

        let (q, q_len) = questions(&device);
        let v       = Tensor::<TestBackend, 4>::ones([2, 16, side, side], &device);
        let answers = Tensor::<TestBackend, 2>::zeros([2, 7], &device);

        let (loss, accuracy) = model.forward_eval(v, q, q_len, answers);
        assert_eq!(accuracy.dims(), [2]);
        // No annotator agrees with anything: zero loss, zero accuracy
        let loss: f32 = loss.into_scalar();
        assert_eq!(loss, 0.0);
    }
}
