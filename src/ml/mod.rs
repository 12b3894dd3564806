// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The network, its loss, and the loops that train and query it.
//
//   config.rs         — VqaConfig, the architecture hyperparameters
//   init.rs           — Xavier-initialised layers with zero biases,
//                       padded word embedding
//   mode.rs           — Mode::{Train, Eval} and mode-aware dropout
//
//   text_embedding.rs — token ids → word vectors (padding → 0)
//   text_lstm.rs      — recurrent question encoder (final cell state)
//   text_cnn.rs       — convolutional question encoder (max over time)
//   fusion.rs         — dual sigmoid gate joining the two encoders
//   attention.rs      — feature normalisation, glimpse attention,
//                       attention pooling
//   classifier.rs     — answer scoring head
//   model.rs          — VqaNet, wiring the pieces together
//
//   loss.rs           — soft-answer loss and VQA accuracy
//   trainer.rs        — Adam loop with a halving learning rate
//   inferencer.rs     — top-k answers from a saved run
//
// Reference: Kazemi & Elqursh (2017) Show, Ask, Attend, and Answer
//            Burn Book §3 (Building Blocks), §5 (Training)

pub mod config;
pub mod init;
pub mod mode;

pub mod text_embedding;
pub mod text_lstm;
pub mod text_cnn;
pub mod fusion;
pub mod attention;
pub mod classifier;

/// VqaNet architecture
pub mod model;

pub mod loss;

/// Training loop with validation, checkpointing and run logs
pub mod trainer;

/// Loads a run and predicts answers
pub mod inferencer;
