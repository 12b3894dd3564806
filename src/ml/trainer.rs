// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
// Per iteration (one batch):
//   lr    = initial_lr · 0.5^(iteration / lr_halflife)
//   loss  = soft-answer cross-entropy (see loss.rs)
//   grads = loss.backward() → Adam step
//
// The learning rate halves every `lr_halflife` iterations,
// counted across epochs rather than reset at each epoch.
//
// Per epoch:
//   - train in Mode::Train on B (autodiff)
//   - evaluate model.valid() in Mode::Eval on B::InnerBackend;
//     batch norm switches to running statistics there
//   - append metrics.csv, rewrite run_log.json, save a checkpoint
//
// Generic over the autodiff backend: the CLI trains on
// Autodiff<Wgpu>, the tests on Autodiff<NdArray>.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::VqaBatcher, dataset::VqaDataset};
use crate::domain::traits::Persistable;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger, RunLog},
};
use crate::ml::{config::VqaConfig, model::VqaNet};

/// Step-decayed learning rate after `iteration` optimiser steps.
pub fn learning_rate(initial_lr: f64, iteration: usize, halflife: usize) -> f64 {
    if halflife == 0 {
        return initial_lr;
    }
    initial_lr * 0.5f64.powf(iteration as f64 / halflife as f64)
}

fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
    }
}

pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &VqaConfig,
    train_dataset: VqaDataset,
    val_dataset:   VqaDataset,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<RunLog> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: VqaNet<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} words, {} answers, {} glimpses, {} CNN block(s)",
        model_cfg.embedding_tokens,
        model_cfg.max_answers,
        model_cfg.glimpses,
        model.cnn_text.num_blocks(),
    );

    let mut optim = AdamConfig::new().init::<B, VqaNet<B>>();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let side    = model_cfg.output_size();
    let batcher = VqaBatcher::new(model_cfg.vision_features, side, side);

    let train_loader = DataLoaderBuilder::new(batcher.clone())
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.data_workers)
        .build(train_dataset);

    // Validation runs on the inner backend, no autodiff graph
    let val_loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .num_workers(cfg.data_workers)
        .build(val_dataset);

    let metrics      = MetricsLogger::new(ckpt_manager.dir().to_string_lossy())?;
    tracing::info!("Logging epoch metrics to '{}'", metrics.csv_path().display());
    let run_log_path = ckpt_manager.file("run_log.json");
    let mut run_log  = RunLog::new(cfg.run_name());
    let mut iteration = 0usize;
    let mut best_val_acc = f64::NEG_INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss = Vec::new();
        let mut train_acc  = Vec::new();

        for batch in train_loader.iter() {
            let lr = learning_rate(cfg.initial_lr, iteration, cfg.lr_halflife);

            let (loss, accuracy) = model.forward_loss(
                batch.features,
                batch.questions,
                batch.lengths,
                batch.answers,
            );

            train_loss.push(loss.clone().into_scalar().elem::<f32>());
            train_acc.push(accuracy.mean().into_scalar().elem::<f32>());

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model     = optim.step(lr, model, grads);
            iteration += 1;
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss = Vec::new();
        let mut val_acc  = Vec::new();

        for batch in val_loader.iter() {
            let (loss, accuracy) = model_valid.forward_eval(
                batch.features,
                batch.questions,
                batch.lengths,
                batch.answers,
            );
            val_loss.push(loss.into_scalar().elem::<f32>());
            val_acc.push(accuracy.mean().into_scalar().elem::<f32>());
        }

        // ── Record ────────────────────────────────────────────────────────────
        let row = EpochMetrics::new(epoch, mean(&train_loss), mean(&train_acc), mean(&val_loss), mean(&val_acc));

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | val_loss={:.4} | val_acc={:.1}% | lr={:.2e}",
            epoch, cfg.epochs, row.train_loss, row.train_acc * 100.0,
            row.val_loss, row.val_acc * 100.0,
            learning_rate(cfg.initial_lr, iteration, cfg.lr_halflife),
        );
        if row.is_improvement(best_val_acc) {
            best_val_acc = row.val_acc;
            tracing::info!("New best validation accuracy: {:.4}", best_val_acc);
        }

        metrics.log(&row)?;
        run_log.push_epoch(train_loss, train_acc, val_acc);
        run_log.save(&run_log_path)?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete after {} iterations", iteration);
    Ok(run_log)
}
