// ============================================================
// Layer 4 — Question and Answer Vocabulary
// ============================================================
// Two index maps, saved together as vocab.json:
//
//   question  word   → token id, 1.. by descending frequency
//                      (0 is reserved for padding; words never
//                      seen in training also map to 0)
//   answer    answer → class index, 0..max_answers, the most
//                      frequent annotator answers only
//
// Ties in frequency are broken alphabetically so the same
// training file always yields the same vocabulary.
//
// The answer list is the model's output space: score column i
// of the classifier belongs to answer_list()[i].
//
// Reference: Kazemi & Elqursh (2017), §3 (answer vocabulary)
//            Rust Book §8.3 (Hash Maps)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::data::preprocessor::Preprocessor;
use crate::domain::{record::QuestionRecord, traits::Persistable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub question: BTreeMap<String, u32>,
    pub answer:   BTreeMap<String, u32>,
}

impl Vocabulary {
    /// Count question words and answers over `records` and keep the
    /// `max_answers` most common answers.
    pub fn build(records: &[QuestionRecord], max_answers: usize, preprocessor: &Preprocessor) -> Self {
        let mut word_counts:   HashMap<String, usize> = HashMap::new();
        let mut answer_counts: HashMap<String, usize> = HashMap::new();

        for record in records {
            for word in preprocessor.question_tokens(&record.question) {
                *word_counts.entry(word).or_default() += 1;
            }
            for answer in &record.answers {
                let answer = preprocessor.clean_answer(answer);
                if !answer.is_empty() {
                    *answer_counts.entry(answer).or_default() += 1;
                }
            }
        }

        let question = rank(word_counts, usize::MAX)
            .into_iter()
            .enumerate()
            .map(|(i, w)| (w, i as u32 + 1))
            .collect();

        let answer = rank(answer_counts, max_answers)
            .into_iter()
            .enumerate()
            .map(|(i, a)| (a, i as u32))
            .collect();

        let vocab = Self { question, answer };
        tracing::info!(
            "Built vocabulary: {} question words, {} answers",
            vocab.question.len(),
            vocab.answer.len()
        );
        vocab
    }

    /// Rows needed in the word embedding (padding row included).
    pub fn embedding_tokens(&self) -> usize {
        self.question.len() + 1
    }

    pub fn answer_index(&self, answer: &str) -> Option<usize> {
        self.answer.get(answer).map(|&i| i as usize)
    }

    /// Answers ordered by class index.
    pub fn answer_list(&self) -> Vec<String> {
        let mut list = vec![String::new(); self.answer.len()];
        for (answer, &i) in &self.answer {
            if let Some(slot) = list.get_mut(i as usize) {
                *slot = answer.clone();
            }
        }
        list
    }
}

/// Keys sorted by descending count, then alphabetically.
fn rank(counts: HashMap<String, usize>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().take(limit).map(|(k, _)| k).collect()
}

impl Persistable for Vocabulary {
    fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write vocabulary to '{path}'"))
    }

    fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary '{path}'"))?;
        let vocab = serde_json::from_str(&json)
            .with_context(|| format!("Malformed vocabulary '{path}'"))?;
        Ok(vocab)
    }
}
