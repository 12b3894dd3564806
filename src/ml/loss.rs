// ============================================================
// Layer 5 — Soft-Answer Loss and VQA Accuracy
// ============================================================
// Each question has 10 human answers. The target for a sample
// is the count of annotators that gave each candidate answer,
// e.g. [.., 7 (for "white"), .., 3 (for "grey"), ..].
//
// Loss: cross-entropy against the count distribution
//   loss = mean_n Σ_a  -log_softmax(scores)[n, a] · counts[n, a] / 10
//
// Accuracy (the official VQA metric):
//   acc = min(0.3 · #annotators agreeing with the prediction, 1)
// so 3 or more agreeing humans count as fully correct.
//
// Reference: Antol et al. (2015) VQA: Visual Question Answering

use burn::{prelude::*, tensor::activation::log_softmax};

/// Number of human answers collected per question.
pub const ANNOTATORS: f64 = 10.0;

/// Credit given per agreeing annotator, capped at 1.0.
pub const AGREEMENT_CREDIT: f64 = 0.3;

/// scores: [n, A] raw logits, counts: [n, A] annotator counts → scalar loss [1]
pub fn soft_answer_loss<B: Backend>(scores: Tensor<B, 2>, counts: Tensor<B, 2>) -> Tensor<B, 1> {
    let nll = log_softmax(scores, 1).neg();
    (nll * counts / ANNOTATORS).sum_dim(1).mean()
}

/// Per-example VQA accuracy of the arg-max answer → [n]
pub fn vqa_accuracy<B: Backend>(scores: Tensor<B, 2>, counts: Tensor<B, 2>) -> Tensor<B, 1> {
    let predicted = scores.argmax(1);            // [n, 1]
    let agreeing  = counts.gather(1, predicted); // [n, 1]
    agreeing
        .mul_scalar(AGREEMENT_CREDIT)
        .clamp_max(1.0)
        .flatten(0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_accuracy_credits_agreement() {
        let device = Default::default();
        // Predictions: answer 0, answer 2, answer 1
        let scores = Tensor::<TestBackend, 2>::from_floats(
            [[5.0, 0.0, 0.0], [0.0, 1.0, 9.0], [0.0, 2.0, 1.0]],
            &device,
        );
        let counts = Tensor::<TestBackend, 2>::from_floats(
            [[10.0, 0.0, 0.0], [0.0, 8.0, 2.0], [0.0, 0.0, 10.0]],
            &device,
        );

        let acc: Vec<f32> = vqa_accuracy(scores, counts).into_data().to_vec().unwrap();
        assert_eq!(acc.len(), 3);
        assert!((acc[0] - 1.0).abs() < 1e-6);
        assert!((acc[1] - 0.6).abs() < 1e-6);
        assert!(acc[2].abs() < 1e-6);
    }

    #[test]
    fn test_loss_is_lower_for_correct_prediction() {
        let device = Default::default();
        let counts = Tensor::<TestBackend, 2>::from_floats([[10.0, 0.0]], &device);
        let good   = Tensor::<TestBackend, 2>::from_floats([[4.0, -4.0]], &device);
        let bad    = Tensor::<TestBackend, 2>::from_floats([[-4.0, 4.0]], &device);

        let good: f32 = soft_answer_loss(good, counts.clone()).into_scalar();
        let bad: f32  = soft_answer_loss(bad, counts).into_scalar();
        assert!(good < bad);
        assert!(good > 0.0);
    }

    #[test]
    fn test_uniform_scores_loss() {
        // Uniform scores over 4 answers: -log(1/4) · 10 / 10 = ln 4
        let device = Default::default();
        let scores = Tensor::<TestBackend, 2>::zeros([1, 4], &device);
        let counts = Tensor::<TestBackend, 2>::from_floats([[10.0, 0.0, 0.0, 0.0]], &device);

        let loss: f32 = soft_answer_loss(scores, counts).into_scalar();
        assert!((loss - 4.0f32.ln()).abs() < 1e-5);
    }
}
