// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the run directory on disk:
//
//   checkpoint.rs      — VqaNet weights (Burn CompactRecorder),
//                        vqa_config.json and train_config.json,
//                        so inference can rebuild the model.
//
//   tokenizer_store.rs — tokenizer.json, a WordLevel tokenizer
//                        over the question vocabulary, shared by
//                        training and inference.
//
//   metrics.rs         — metrics.csv (epoch means) and
//                        run_log.json (per-batch history).
//
//   plot.rs            — accuracy-vs-epoch SVG for one or more
//                        runs.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Question tokenizer persistence
pub mod tokenizer_store;

/// Training metrics CSV and run log
pub mod metrics;

/// Accuracy curves rendered with plotters
pub mod plot;
