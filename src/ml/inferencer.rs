// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Answers a question about one image with a trained run:
//
//   run dir → vqa_config.json → VqaNet::init → latest checkpoint
//           → vocab.json + tokenizer.json → SampleEncoder
//
//   question → token ids ─┐
//   features ─────────────┼→ VqaBatcher (batch of one)
//                         ▼
//               VqaNet::forward(Mode::Eval) → softmax → top k
//
// Score columns past the end of the answer vocabulary (when fewer
// distinct answers were seen than max_answers) have no label and
// are never returned.

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::activation::softmax,
};

use crate::data::{
    batcher::{VqaBatch, VqaBatcher},
    dataset::VqaSample,
    encoder::SampleEncoder,
    vocab::Vocabulary,
};
use crate::domain::{
    prediction::Prediction,
    traits::{AnswerPredictor, Persistable},
};
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::{config::VqaConfig, mode::Mode, model::VqaNet};

pub struct Inferencer<B: Backend> {
    model:   VqaNet<B>,
    config:  VqaConfig,
    encoder: SampleEncoder,
    batcher: VqaBatcher,
    answers: Vec<String>,
    device:  B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let config    = ckpt_manager.load_config()?;
        let vocab     = Vocabulary::load(&ckpt_manager.file("vocab.json"))?;
        let tokenizer = TokenizerStore::new(ckpt_manager.dir().to_string_lossy()).load()?;

        let model = ckpt_manager.load_model(config.init::<B>(&device), &device)?;
        tracing::info!("Model loaded from checkpoint");

        let side = config.output_size();
        let encoder = SampleEncoder::new(tokenizer, vocab, config.feature_len(), config.max_answers);
        Ok(Self {
            answers: encoder.vocab().answer_list(),
            model,
            encoder,
            batcher: VqaBatcher::new(config.vision_features, side, side),
            config,
            device,
        })
    }
}

impl<B: Backend> AnswerPredictor for Inferencer<B> {
    fn predict(&self, features: &[f32], question: &str, top_k: usize) -> Result<Vec<Prediction>> {
        self.encoder.check_features(features)?;
        let sample = VqaSample {
            features: features.to_vec(),
            question: self.encoder.encode_question(question)?,
            answers:  vec![0.0; self.config.max_answers],
        };

        let batch: VqaBatch<B> = self.batcher.batch(vec![sample], &self.device);
        let scores = self.model.forward(batch.features, batch.questions, batch.lengths, Mode::Eval);

        let probs: Vec<f32> = softmax(scores, 1)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read scores: {e:?}"))?;

        let best = top_k_indices(&probs[..self.answers.len().min(probs.len())], top_k);
        tracing::debug!("Top answer indices for '{}': {:?}", question, best);

        Ok(best
            .into_iter()
            .map(|(i, p)| Prediction::new(self.answers[i].clone(), i, p))
            .collect())
    }
}

/// The `k` largest values with their indices, largest first.
pub fn top_k_indices(values: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = values.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::Preprocessor;
    use crate::domain::record::QuestionRecord;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_top_k_orders_by_value() {
        let ranked = top_k_indices(&[0.1, 0.5, 0.2, 0.2], 3);
        assert_eq!(ranked, vec![(1, 0.5), (2, 0.2), (3, 0.2)]);
        assert_eq!(top_k_indices(&[0.3], 5).len(), 1);
    }

    fn write_run(dir: &std::path::Path) -> VqaConfig {
        let records = vec![
            QuestionRecord::new("what color is the cat?", vec![], vec!["white".into(), "white".into(), "black".into()]),
            QuestionRecord::new("how many dogs?", vec![], vec!["2".into()]),
        ];
        let ckpt  = CheckpointManager::new(dir.to_str().unwrap()).unwrap();
        let vocab = Vocabulary::build(&records, 3, &Preprocessor::new());
        vocab.save(&ckpt.file("vocab.json")).unwrap();
        TokenizerStore::new(dir.to_str().unwrap()).load_or_build(&vocab).unwrap();

        // More output columns than known answers
        let cfg = VqaConfig::new(vocab.embedding_tokens())
            .with_max_answers(5)
            .with_embedding_features(4)
            .with_question_features(6)
            .with_vision_features(8)
            .with_image_size(64)
            .with_mid_features(5)
            .with_classifier_features(7);
        ckpt.save_config(&cfg).unwrap();
        ckpt.save_model(&cfg.init::<TestBackend>(&Default::default()), 1).unwrap();
        cfg
    }

    #[test]
    fn test_predicts_known_answers_only() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_run(dir.path());

        let ckpt       = CheckpointManager::open(dir.path().to_str().unwrap()).unwrap();
        let inferencer = Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default()).unwrap();

        let features    = vec![0.5; cfg.feature_len()];
        let predictions = inferencer.predict(&features, "What color is the dog?", 10).unwrap();

        assert_eq!(predictions.len(), 3);
        assert!(predictions.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert!(predictions.iter().all(|p| ["white", "black", "2"].contains(&p.answer.as_str())));
        assert!(predictions.iter().map(|p| p.probability).sum::<f32>() <= 1.0 + 1e-5);
    }

    #[test]
    fn test_rejects_wrong_feature_length() {
        let dir = tempfile::tempdir().unwrap();
        write_run(dir.path());

        let ckpt       = CheckpointManager::open(dir.path().to_str().unwrap()).unwrap();
        let inferencer = Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default()).unwrap();
        assert!(inferencer.predict(&[0.0; 3], "what color?", 1).is_err());
    }

    #[test]
    fn test_rejects_empty_question() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_run(dir.path());

        let ckpt       = CheckpointManager::open(dir.path().to_str().unwrap()).unwrap();
        let inferencer = Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default()).unwrap();
        assert!(inferencer.predict(&vec![0.0; cfg.feature_len()], "???", 1).is_err());
    }
}
