// ============================================================
// Layer 5 — Visual Attention
// ============================================================
// Three pieces, applied in order by VqaNet:
//
//   normalize_features  v / (‖v‖₂ + ε) per spatial cell
//   Attention           (v, q) → glimpse logits [n, G, H, W]
//   apply_attention     softmax per glimpse, weighted sum of v
//
// Attention projects v with a 1×1 conv (no bias) and q with a
// linear layer into the same mid-size space, tiles q over every
// grid cell, adds, applies ReLU, and projects down to G glimpse
// maps with a second 1×1 conv.
//
// Reference: Kazemi & Elqursh (2017) Show, Ask, Attend, and Answer
//            Xu et al. (2015) Show, Attend and Tell

use burn::{
    nn::{conv::Conv2d, Dropout, DropoutConfig, Linear},
    prelude::*,
    tensor::activation::{relu, softmax},
};

use crate::ml::init;
use crate::ml::mode::{self, Mode};

/// Added to the L2 norm so an all-zero cell does not divide by zero.
pub const NORM_EPSILON: f64 = 1e-8;

/// L2-normalise every spatial cell's channel vector.
/// [n, C, H, W] → [n, C, H, W]
pub fn normalize_features<B: Backend>(v: Tensor<B, 4>) -> Tensor<B, 4> {
    let norm = v
        .clone()
        .powf_scalar(2.0)
        .sum_dim(1)
        .sqrt()
        .add_scalar(NORM_EPSILON);
    let dims = v.dims();
    v / norm.expand(dims)
}

// ─── Attention ────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct Attention<B: Backend> {
    v_conv:  Conv2d<B>,
    q_lin:   Linear<B>,
    x_conv:  Conv2d<B>,
    dropout: Dropout,
}

impl<B: Backend> Attention<B> {
    pub fn new(
        v_features:   usize,
        q_features:   usize,
        mid_features: usize,
        glimpses:     usize,
        drop:         f64,
        device:       &B::Device,
    ) -> Self {
        Self {
            // q_lin carries the bias for the summed projection
            v_conv:  init::conv2d([v_features, mid_features], [1, 1], [0, 0], false, device),
            q_lin:   init::linear(q_features, mid_features, true, device),
            x_conv:  init::conv2d([mid_features, glimpses], [1, 1], [0, 0], true, device),
            dropout: DropoutConfig::new(drop).init(),
        }
    }

    /// v: [n, C, H, W], q: [n, Q] → glimpse logits [n, G, H, W]
    pub fn forward(&self, v: Tensor<B, 4>, q: Tensor<B, 2>, mode: Mode) -> Tensor<B, 4> {
        let v = self.v_conv.forward(mode::dropout(&self.dropout, v, mode));
        let q = self.q_lin.forward(mode::dropout(&self.dropout, q, mode));
        let q = tile_over_grid(q, v.dims());

        let x = relu(v + q);
        self.x_conv.forward(mode::dropout(&self.dropout, x, mode))
    }
}

/// Repeat a [n, C] vector over every cell of a [n, C, H, W] map.
pub fn tile_over_grid<B: Backend>(vector: Tensor<B, 2>, map_dims: [usize; 4]) -> Tensor<B, 4> {
    let [n, c, _, _] = map_dims;
    vector.reshape([n, c, 1, 1]).expand(map_dims)
}

/// Pool the feature grid with each glimpse's softmaxed attention map.
///
/// v: [n, C, H, W], attention: [n, G, H, W] → [n, G·C]
/// (glimpse-major: all C channels of glimpse 0, then glimpse 1, …)
pub fn apply_attention<B: Backend>(v: Tensor<B, 4>, attention: Tensor<B, 4>) -> Tensor<B, 2> {
    let [n, c, h, w] = v.dims();
    let glimpses     = attention.dims()[1];
    let spatial      = h * w;

    let weights = attention_weights(attention);                 // [n, G, S]
    let v       = v.reshape([n, c, spatial]).swap_dims(1, 2);   // [n, S, C]

    // Σ_s weight[g, s] · v[s, c] for every glimpse at once
    weights.matmul(v).reshape([n, glimpses * c])
}

/// Softmax each glimpse over the flattened grid.
/// [n, G, H, W] → [n, G, H·W], every row summing to 1.
pub fn attention_weights<B: Backend>(attention: Tensor<B, 4>) -> Tensor<B, 3> {
    let [n, g, h, w] = attention.dims();
    softmax(attention.reshape([n, g, h * w]), 2)
}
