// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Answers one question about one image with a finished run:
//
//   Step 1: Open the run directory        (Layer 6 - infra)
//   Step 2: Rebuild model + encoder       (Layer 5 - ml)
//   Step 3: Read the image feature file   (plain JSON array)
//   Step 4: Rank answers                  (Layer 5 - ml)
//
// The feature file holds the flattened C·H·W grid produced by
// the same feature extractor used for the training records.

use anyhow::{Context, Result};
use burn::{
    backend::{wgpu::WgpuDevice, Wgpu},
    prelude::*,
};

use crate::domain::{prediction::Prediction, traits::AnswerPredictor};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase<B: Backend> {
    inferencer: Inferencer<B>,
}

impl PredictUseCase<Wgpu> {
    pub fn new(run_dir: &str) -> Result<Self> {
        Self::with_device(run_dir, WgpuDevice::default())
    }
}

impl<B: Backend> PredictUseCase<B> {
    pub fn with_device(run_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt_manager = CheckpointManager::open(run_dir)?;
        let inferencer   = Inferencer::from_checkpoint(&ckpt_manager, device)?;
        Ok(Self { inferencer })
    }

    pub fn answer(&self, features_path: &str, question: &str, top_k: usize) -> Result<Vec<Prediction>> {
        let features = load_features(features_path)?;
        self.inferencer.predict(&features, question, top_k)
    }
}

/// Read a flattened feature grid stored as a JSON array of numbers.
pub fn load_features(path: &str) -> Result<Vec<f32>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read feature file '{path}'"))?;
    serde_json::from_str(&json)
        .with_context(|| format!("'{path}' is not a JSON array of numbers"))
}
