// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands, `train`, `predict` and `plot`,
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{plot_use_case::LabelledRun, train_use_case::TrainConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train VqaNet on JSON-lines question records
    Train(TrainArgs),

    /// Answer a question about one image with a trained run
    Predict(PredictArgs),

    /// Plot validation accuracy per epoch for one or more runs
    Plot(PlotArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON-lines file of training records
    #[arg(long)]
    pub train_data: String,

    /// JSON-lines file of validation records (default: split from --train-data)
    #[arg(long)]
    pub val_data: Option<String>,

    /// Directory for checkpoints, vocabulary and logs
    #[arg(long, default_value = "runs/default")]
    pub run_dir: String,

    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Learning rate at iteration 0
    #[arg(long, default_value_t = 1e-3)]
    pub initial_lr: f64,

    /// Iterations after which the learning rate has halved
    #[arg(long, default_value_t = 50_000)]
    pub lr_halflife: usize,

    /// Background threads preparing batches
    #[arg(long, default_value_t = 8)]
    pub data_workers: usize,

    /// Share held out for validation when --val-data is not given
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Seed for the shuffle and the train/validation split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of most frequent answers the model chooses between
    #[arg(long, default_value_t = 3000)]
    pub max_answers: usize,

    #[arg(long, default_value_t = 300)]
    pub embedding_features: usize,

    /// LSTM hidden size and CNN kernel depth
    #[arg(long, default_value_t = 1024)]
    pub question_features: usize,

    /// Channels of the image feature grid
    #[arg(long, default_value_t = 2048)]
    pub vision_features: usize,

    /// Image side the features were extracted at (grid side = size / 32)
    #[arg(long, default_value_t = 448)]
    pub image_size: usize,

    #[arg(long, default_value_t = 512)]
    pub mid_features: usize,

    #[arg(long, default_value_t = 1024)]
    pub classifier_features: usize,

    #[arg(long, default_value_t = 2)]
    pub glimpses: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Text convolution width along the question
    #[arg(long, default_value_t = 3)]
    pub kernel_width: usize,

    /// Use a single convolution block instead of three
    #[arg(long)]
    pub single_layer_cnn: bool,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_data:          a.train_data,
            val_data:            a.val_data,
            run_dir:             a.run_dir,
            epochs:              a.epochs,
            batch_size:          a.batch_size,
            initial_lr:          a.initial_lr,
            lr_halflife:         a.lr_halflife,
            data_workers:        a.data_workers,
            val_fraction:        a.val_fraction,
            seed:                a.seed,
            max_answers:         a.max_answers,
            embedding_features:  a.embedding_features,
            question_features:   a.question_features,
            vision_features:     a.vision_features,
            image_size:          a.image_size,
            mid_features:        a.mid_features,
            classifier_features: a.classifier_features,
            glimpses:            a.glimpses,
            dropout:             a.dropout,
            kernel_width:        a.kernel_width,
            multilayer_cnn:      !a.single_layer_cnn,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Run directory written by `train`
    #[arg(long, default_value = "runs/default")]
    pub run_dir: String,

    /// JSON array with the image's flattened feature grid
    #[arg(long)]
    pub features: String,

    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    #[arg(long, default_value_t = 5)]
    pub top_k: usize,
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Run log to plot, as LABEL=PATH (repeatable)
    #[arg(long = "run", required = true)]
    pub runs: Vec<LabelledRun>,

    /// Output SVG file
    #[arg(long, default_value = "val_acc.svg")]
    pub output: String,
}
