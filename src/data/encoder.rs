// ============================================================
// Layer 4 — Sample Encoder
// ============================================================
// Turns a QuestionRecord into a VqaSample:
//
//   question  → Preprocessor → tokenizer → token ids
//   answers   → Preprocessor → vocabulary → count per answer index
//   features  → checked against the expected C·H·W length
//
// Every sample must keep at least one question token, since the
// recurrent encoder's final state is taken at position len - 1.
// A question that cleans down to nothing is rejected here, before
// it can reach a batch.
//
// Answers outside the answer vocabulary are dropped; a question
// whose answers are all rare simply has an all-zero target.

use anyhow::{bail, Result};
use tokenizers::Tokenizer;

use crate::data::{dataset::VqaSample, preprocessor::Preprocessor, vocab::Vocabulary};
use crate::domain::record::QuestionRecord;

pub struct SampleEncoder {
    tokenizer:    Tokenizer,
    vocab:        Vocabulary,
    preprocessor: Preprocessor,
    feature_len:  usize,
    max_answers:  usize,
}

impl SampleEncoder {
    pub fn new(tokenizer: Tokenizer, vocab: Vocabulary, feature_len: usize, max_answers: usize) -> Self {
        Self {
            tokenizer,
            vocab,
            preprocessor: Preprocessor::new(),
            feature_len,
            max_answers,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Token ids for a question; errors if nothing is left after cleaning.
    pub fn encode_question(&self, question: &str) -> Result<Vec<u32>> {
        let clean = self.preprocessor.clean_question(question);
        if clean.is_empty() {
            bail!("Question '{question}' has no words after cleaning");
        }

        let encoding = self
            .tokenizer
            .encode(clean.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Annotator count per answer index, length `max_answers`.
    pub fn encode_answers(&self, answers: &[String]) -> Vec<f32> {
        let mut counts = vec![0.0f32; self.max_answers];
        for answer in answers {
            let answer = self.preprocessor.clean_answer(answer);
            if let Some(slot) = self.vocab.answer_index(&answer).and_then(|i| counts.get_mut(i)) {
                *slot += 1.0;
            }
        }
        counts
    }

    pub fn check_features(&self, features: &[f32]) -> Result<()> {
        if features.len() != self.feature_len {
            bail!(
                "Expected {} image feature values, got {}",
                self.feature_len,
                features.len()
            );
        }
        Ok(())
    }

    pub fn encode(&self, record: &QuestionRecord) -> Result<VqaSample> {
        self.check_features(&record.features)?;
        Ok(VqaSample {
            features: record.features.clone(),
            question: self.encode_question(&record.question)?,
            answers:  self.encode_answers(&record.answers),
        })
    }

    /// Encode every record, skipping (and logging) the invalid ones.
    pub fn encode_all(&self, records: &[QuestionRecord]) -> Vec<VqaSample> {
        let samples: Vec<VqaSample> = records
            .iter()
            .filter_map(|record| match self.encode(record) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    tracing::warn!("Skipping record {:?}: {}", record.question_id, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Encoded {}/{} records", samples.len(), records.len());
        samples
    }
}
