// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Owns the run directory. Everything needed to resume analysis
// or answer questions later lives side by side:
//
//   runs/<name>/
//     model_epoch_1.mpk.gz   ← VqaNet weights after epoch 1
//     model_epoch_2.mpk.gz
//     ...
//     latest_epoch.json      ← number of the newest checkpoint
//     vqa_config.json        ← architecture, to rebuild VqaNet
//     train_config.json      ← the full training run settings
//     vocab.json             ← question words and answers
//     tokenizer.json         ← question tokenizer
//     metrics.csv            ← one row per epoch
//     run_log.json           ← per-batch loss / accuracy history
//
// Weights go through Burn's CompactRecorder (MessagePack +
// gzip). Loading needs a model of the same architecture, which
// is why vqa_config.json is written before the first epoch.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::ml::{config::VqaConfig, model::VqaNet};

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the run directory if it does not exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create run directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing run directory without creating anything.
    pub fn open(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        if !dir.is_dir() {
            anyhow::bail!("Run directory '{}' does not exist. Have you run 'train' first?", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path of a file inside the run directory, as a string.
    pub fn file(&self, name: &str) -> String {
        self.dir.join(name).to_string_lossy().into_owned()
    }

    /// Write {dir}/model_epoch_{epoch}.mpk.gz and point latest_epoch.json at it.
    pub fn save_model<B: Backend>(&self, model: &VqaNet<B>, epoch: usize) -> Result<()> {
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        fs::write(self.dir.join("latest_epoch.json"), serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the newest checkpoint into `model`.
    pub fn load_model<B: Backend>(&self, model: VqaNet<B>, device: &B::Device) -> Result<VqaNet<B>> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &VqaConfig) -> Result<()> {
        write_json(&self.dir.join("vqa_config.json"), cfg)
    }

    pub fn load_config(&self) -> Result<VqaConfig> {
        let path = self.dir.join("vqa_config.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read model config '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_train_config(&self, cfg: &TrainConfig) -> Result<()> {
        write_json(&self.dir.join("train_config.json"), cfg)
    }

    /// Epoch number of the newest checkpoint.
    pub fn latest_epoch(&self) -> Result<usize> {
        let s = fs::read_to_string(self.dir.join("latest_epoch.json"))
            .with_context(|| "Cannot find 'latest_epoch.json'. Have you run 'train' first?")?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use crate::ml::mode::Mode;

    type TestBackend = NdArray<f32>;

    fn tiny_config() -> VqaConfig {
        VqaConfig::new(6)
            .with_max_answers(4)
            .with_embedding_features(4)
            .with_question_features(6)
            .with_vision_features(8)
            .with_image_size(64)
            .with_mid_features(5)
            .with_classifier_features(7)
            .with_glimpses(1)
    }

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().to_str().unwrap()).unwrap();
        let cfg  = tiny_config();

        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.embedding_tokens, 6);
        assert_eq!(loaded.glimpses, 1);
        assert_eq!(loaded.image_size, 64);
    }

    #[test]
    fn test_latest_checkpoint_is_restored() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().to_str().unwrap()).unwrap();
        let device = Default::default();
        let cfg    = tiny_config();

        let first: VqaNet<TestBackend>  = cfg.init(&device);
        let second: VqaNet<TestBackend> = cfg.init(&device);
        ckpt.save_model(&first, 1).unwrap();
        ckpt.save_model(&second, 2).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);

        let restored = ckpt.load_model(cfg.init::<TestBackend>(&device), &device).unwrap();

        let side  = cfg.output_size();
        let v     = Tensor::<TestBackend, 4>::ones([1, 8, side, side], &device);
        let q     = Tensor::<TestBackend, 2, Int>::from_ints([[1, 2, 3]], &device);
        let q_len = Tensor::<TestBackend, 1, Int>::from_ints([3], &device);

        let expected: Vec<f32> = second.forward(v.clone(), q.clone(), q_len.clone(), Mode::Eval)
            .into_data().to_vec().unwrap();
        let actual: Vec<f32>   = restored.forward(v, q, q_len, Mode::Eval)
            .into_data().to_vec().unwrap();
        // CompactRecorder stores half precision
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-2, "{a} vs {e}");
        }
    }

    #[test]
    fn test_open_missing_run_fails() {
        assert!(CheckpointManager::open("/no/such/run").is_err());
    }
}
