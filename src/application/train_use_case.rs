// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load question records         (Layer 4 - data)
//   Step 2: Train / validation records    (Layer 4 - data)
//   Step 3: Build or load vocabulary      (Layer 4 - data)
//   Step 4: Build or load tokenizer       (Layer 6 - infra)
//   Step 5: Save model + run config       (Layer 6 - infra)
//   Step 6: Encode samples, build datasets(Layer 4 - data)
//   Step 7: Run training loop             (Layer 5 - ml)
//
// The vocabulary is built from the training records only, so
// validation questions can contain unseen (id 0) words exactly
// like questions asked after training.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::{
    backend::{wgpu::WgpuDevice, Autodiff, Wgpu},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    dataset::VqaDataset,
    encoder::SampleEncoder,
    loader::JsonlLoader,
    preprocessor::Preprocessor,
    splitter::split_train_val,
    vocab::Vocabulary,
};
use crate::domain::traits::{Persistable, RecordSource};
use crate::infra::{checkpoint::CheckpointManager, metrics::RunLog, tokenizer_store::TokenizerStore};
use crate::ml::{config::VqaConfig, trainer::run_training};

type TrainBackend = Autodiff<Wgpu>;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs, saved as train_config.json in the run
// directory next to the checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// JSON-lines training records
    pub train_data:   String,
    /// Separate validation records; split from train_data if absent
    pub val_data:     Option<String>,
    /// Output directory for checkpoints, vocab and logs
    pub run_dir:      String,
    pub epochs:       usize,
    pub batch_size:   usize,
    pub initial_lr:   f64,
    /// Iterations after which the learning rate has halved
    pub lr_halflife:  usize,
    pub data_workers: usize,
    /// Share of train_data held out when val_data is absent
    pub val_fraction: f64,
    pub seed:         u64,

    pub max_answers:         usize,
    pub embedding_features:  usize,
    pub question_features:   usize,
    pub vision_features:     usize,
    pub image_size:          usize,
    pub mid_features:        usize,
    pub classifier_features: usize,
    pub glimpses:            usize,
    pub dropout:             f64,
    pub kernel_width:        usize,
    pub multilayer_cnn:      bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_data:   "data/train.jsonl".to_string(),
            val_data:     None,
            run_dir:      "runs/default".to_string(),
            epochs:       50,
            batch_size:   128,
            initial_lr:   1e-3,
            lr_halflife:  50_000,
            data_workers: 8,
            val_fraction: 0.2,
            seed:         42,

            max_answers:         3000,
            embedding_features:  300,
            question_features:   1024,
            vision_features:     2048,
            image_size:          448,
            mid_features:        512,
            classifier_features: 1024,
            glimpses:            2,
            dropout:             0.5,
            kernel_width:        3,
            multilayer_cnn:      true,
        }
    }
}

impl TrainConfig {
    /// Last path component of run_dir, used as the run log name.
    pub fn run_name(&self) -> String {
        Path::new(&self.run_dir)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.run_dir.clone())
    }

    pub fn model_config(&self, embedding_tokens: usize) -> VqaConfig {
        VqaConfig::new(embedding_tokens)
            .with_max_answers(self.max_answers)
            .with_embedding_features(self.embedding_features)
            .with_question_features(self.question_features)
            .with_vision_features(self.vision_features)
            .with_image_size(self.image_size)
            .with_mid_features(self.mid_features)
            .with_classifier_features(self.classifier_features)
            .with_glimpses(self.glimpses)
            .with_dropout(self.dropout)
            .with_kernel_width(self.kernel_width)
            .with_multilayer_cnn(self.multilayer_cnn)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.epochs == 0 {
            bail!("batch_size and epochs must be at least 1");
        }
        if !(0.0..1.0).contains(&self.val_fraction) {
            bail!("val_fraction must be in [0, 1), got {}", self.val_fraction);
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        if self.image_size < 32 || self.kernel_width == 0 || self.glimpses == 0 {
            bail!("image_size must be ≥ 32, kernel_width and glimpses ≥ 1");
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train on the default WGPU device.
    pub fn execute(&self) -> Result<RunLog> {
        let device = WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        self.execute_on::<TrainBackend>(device)
    }

    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<RunLog> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load records ──────────────────────────────────────────────
        tracing::info!("Loading training records from '{}'", cfg.train_data);
        let records = JsonlLoader::new(&cfg.train_data).load_all()?;
        let unlabelled = records.iter().filter(|r| !r.is_labelled()).count();
        if unlabelled > 0 {
            tracing::warn!("{} training records have no answers and only add zero targets", unlabelled);
        }

        // ── Step 2: Train / validation records ────────────────────────────────
        let (train_records, val_records) = match &cfg.val_data {
            Some(path) => (records, JsonlLoader::new(path).load_all()?),
            None => split_train_val(records, 1.0 - cfg.val_fraction, cfg.seed),
        };
        tracing::info!("Split: {} train, {} validation", train_records.len(), val_records.len());

        // ── Step 3: Vocabulary ────────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.run_dir)?;
        let vocab_path   = ckpt_manager.file("vocab.json");
        let vocab = if Path::new(&vocab_path).exists() {
            tracing::info!("Loading existing vocabulary from '{}'", vocab_path);
            Vocabulary::load(&vocab_path)?
        } else {
            let vocab = Vocabulary::build(&train_records, cfg.max_answers, &Preprocessor::new());
            vocab.save(&vocab_path)?;
            vocab
        };

        // ── Step 4: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.run_dir).load_or_build(&vocab)?;

        // ── Step 5: Save configs for inference ────────────────────────────────
        let model_cfg = cfg.model_config(vocab.embedding_tokens());
        ckpt_manager.save_config(&model_cfg)?;
        ckpt_manager.save_train_config(cfg)?;

        // ── Step 6: Encode samples ────────────────────────────────────────────
        let encoder = SampleEncoder::new(tokenizer, vocab, model_cfg.feature_len(), model_cfg.max_answers);
        let train_samples = encoder.encode_all(&train_records);
        let val_samples   = encoder.encode_all(&val_records);
        if train_samples.is_empty() {
            bail!("No usable training samples in '{}'", cfg.train_data);
        }

        let train_dataset = VqaDataset::new(train_samples);
        let val_dataset   = VqaDataset::new(val_samples);
        tracing::info!(
            "Datasets ready: {} train, {} validation samples",
            train_dataset.sample_count(),
            val_dataset.sample_count()
        );

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        run_training::<B>(cfg, &model_cfg, train_dataset, val_dataset, &ckpt_manager, device)
    }
}
