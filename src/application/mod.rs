// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case coordinates the other layers for one command:
//
//   train   → TrainUseCase    records → run directory
//   predict → PredictUseCase  run directory + image + question → answers
//   plot    → PlotUseCase     run logs → accuracy SVG
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Answering a question with a trained run
pub mod predict_use_case;

// Comparing runs by validation accuracy
pub mod plot_use_case;
