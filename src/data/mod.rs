// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the record file on disk and the tensor
// batches the model consumes.
//
//   records.jsonl
//       │
//       ▼
//   JsonlLoader       → QuestionRecord (question, features, answers)
//       │
//       ▼
//   Vocabulary        → question word ids, top answers (vocab.json)
//       │
//       ▼
//   SampleEncoder     → Preprocessor + tokenizer → VqaSample
//       │
//       ▼
//   split_train_val   → seeded train / validation split
//       │
//       ▼
//   VqaDataset        → Burn's Dataset trait
//       │
//       ▼
//   VqaBatcher        → pads questions, stacks features
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads question records from JSON-lines files
pub mod loader;

/// Normalises question and answer strings
pub mod preprocessor;

/// Question-word and answer index maps
pub mod vocab;

/// Record → tokenised sample with answer counts
pub mod encoder;

/// Implements Burn's Dataset trait for VQA samples
pub mod dataset;

/// Implements Burn's Batcher trait with per-batch padding
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
