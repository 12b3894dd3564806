// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Saves and loads the question tokenizer (tokenizer.json).
//
// The tokenizer is a HuggingFace WordLevel model whose vocabulary
// is exactly the question half of vocab.json, so token ids agree
// with the embedding rows the model was trained with:
//
//   "[PAD]" → 0      padding, and the unknown-word id
//   word    → 1..    from Vocabulary::question
//
// In tokenizers 0.15 training a WordLevel model through the
// Trainer API needs a ModelWrapper round-trip, so the JSON is
// written directly and loaded back with Tokenizer::from_file.
//
// Input must already be cleaned by the Preprocessor: the
// pre-tokenizer only splits on whitespace.
//
// Reference: HuggingFace tokenizers documentation (WordLevel)

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::data::vocab::Vocabulary;
use crate::ml::init::PADDING_TOKEN;

pub const PAD_TOKEN: &str = "[PAD]";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    /// Load an existing tokenizer or build one from the vocabulary
    pub fn load_or_build(&self, vocab: &Vocabulary) -> Result<Tokenizer> {
        if self.path().exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building tokenizer ({} question words)", vocab.question.len());
            self.build_and_save(vocab)
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }

    fn build_and_save(&self, vocab: &Vocabulary) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let mut words = serde_json::Map::new();
        words.insert(PAD_TOKEN.to_string(), serde_json::json!(PADDING_TOKEN));
        for (word, id) in &vocab.question {
            words.insert(word.clone(), serde_json::json!(id));
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PADDING_TOKEN, "content": PAD_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": { "type": "Lowercase" },
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": words,
                "unk_token": PAD_TOKEN
            }
        });

        let path = self.path();
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!("Tokenizer saved to '{}'", path.display());
        self.load()
    }
}
