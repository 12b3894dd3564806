// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
//   1. `train`   — trains VqaNet and writes a run directory
//   2. `predict` — answers a question about one image
//   3. `plot`    — draws validation accuracy curves
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PlotArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "vqa-net",
    version = "0.1.0",
    about = "Train an attention-based visual question answering model, then ask it about images."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Plot(args)    => run_plot(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on records in: {}", args.train_data);
    let run_dir = args.run_dir.clone();

    let log = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete: {} epochs. Run saved to '{}'.", log.epochs(), run_dir);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case    = PredictUseCase::new(&args.run_dir)?;
    let predictions = use_case.answer(&args.features, &args.question, args.top_k)?;

    println!("\nQuestion: {}", args.question);
    for (rank, p) in predictions.iter().enumerate() {
        println!("  {}. {:<20} {:>6.2}%  (answer #{})", rank + 1, p.answer, p.probability * 100.0, p.index);
    }
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    use crate::application::plot_use_case::PlotUseCase;

    PlotUseCase::new(args.runs, &args.output).execute()?;
    println!("Accuracy plot written to '{}'", args.output);
    Ok(())
}
