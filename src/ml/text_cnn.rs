// ============================================================
// Layer 5 — Convolutional Question Encoder
// ============================================================
// token ids → embedding → dropout → tanh → conv blocks → max-pool
//
// The embedded question is laid out as a one-channel image of
// shape [features, len]. Each ConvBlock's kernel spans the whole
// feature height (plus padding), so the output height is 1 and
// the convolution slides along the sequence axis only: a 1D
// convolution over tokens written with a 2D primitive.
//
//   [n, 1, E, L] ─conv(E+2p × k)→ [n, D, 1, L] ─bn, relu, swap→ [n, 1, D, L]
//
// Swapping channels back into the height axis lets the next
// block treat the D feature maps as a new [D, L] grid.
//
// Every block's output is masked to zero at positions >= length,
// so the next block sees padded columns exactly as it would see
// the convolution's own zero padding. A question then encodes the
// same whatever width its batch was padded to (with running batch
// norm statistics), and padding never wins the final max-pool.
//
// Reference: Kim (2014) Convolutional Neural Networks for
//            Sentence Classification

use burn::{
    nn::{BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Embedding, conv::Conv2d},
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::init;
use crate::ml::mode::{self, Mode};
use crate::ml::text_embedding::embed_tokens;

/// Symmetric padding used on both axes for a kernel of width `k`.
pub fn padding_for(kernel_width: usize) -> usize {
    kernel_width.saturating_sub(1).div_ceil(2)
}

// ─── ConvBlock ────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv:      Conv2d<B>,
    batchnorm: BatchNorm<B>,
}

impl<B: Backend> ConvBlock<B> {
    /// `height` is the height of the incoming one-channel grid
    /// (embedding features for the first block, depth afterwards).
    pub fn new(kernel_depth: usize, height: usize, kernel_width: usize, device: &B::Device) -> Self {
        let pad = padding_for(kernel_width);
        Self {
            conv: init::conv2d(
                [1, kernel_depth],
                [height + 2 * pad, kernel_width],
                [pad, pad],
                true,
                device,
            ),
            batchnorm: BatchNormConfig::new(kernel_depth).init(device),
        }
    }

    /// [n, 1, height, len] → [n, 1, depth, len']
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = relu(self.batchnorm.forward(x));
        x.swap_dims(1, 2)
    }
}

// ─── CnnTextProcessor ─────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct CnnTextProcessor<B: Backend> {
    embedding:    Embedding<B>,
    dropout:      Dropout,
    blocks:       Vec<ConvBlock<B>>,
    kernel_depth: usize,
}

impl<B: Backend> CnnTextProcessor<B> {
    pub fn new(
        embedding_tokens:   usize,
        embedding_features: usize,
        kernel_depth:       usize,
        kernel_width:       usize,
        drop:               f64,
        multilayer:         bool,
        device:             &B::Device,
    ) -> Self {
        let mut blocks = vec![ConvBlock::new(kernel_depth, embedding_features, kernel_width, device)];
        if multilayer {
            blocks.push(ConvBlock::new(kernel_depth, kernel_depth, kernel_width, device));
            blocks.push(ConvBlock::new(kernel_depth, kernel_depth, kernel_width, device));
        }

        Self {
            embedding: init::padded_embedding(embedding_tokens, embedding_features, device),
            dropout:   DropoutConfig::new(drop).init(),
            blocks,
            kernel_depth,
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// q: [batch, len] token ids, q_len: [batch] true lengths (>= 1)
    /// → [batch, kernel_depth]
    pub fn forward(&self, q: Tensor<B, 2, Int>, q_len: Tensor<B, 1, Int>, mode: Mode) -> Tensor<B, 2> {
        let embedded = embed_tokens(&self.embedding, q);
        let tanhed   = mode::dropout(&self.dropout, embedded, mode).tanh();

        // [n, L, E] → [n, 1, E, L]
        let mut c: Tensor<B, 4> = tanhed.swap_dims(1, 2).unsqueeze_dim(1);
        for block in &self.blocks {
            c = mask_padding(block.forward(c), q_len.clone());
        }

        // Activations are post-ReLU (>= 0), so masked zeros never win the max
        let [batch, _, depth, width] = c.dims();
        c.reshape([batch, depth, width])
            .max_dim(2)
            .reshape([batch, self.kernel_depth])
    }
}

/// Zero every column at or past each question's length.
/// x: [n, 1, depth, width], lengths: [n] → [n, 1, depth, width]
pub fn mask_padding<B: Backend>(x: Tensor<B, 4>, lengths: Tensor<B, 1, Int>) -> Tensor<B, 4> {
    let dims = x.dims();
    let [batch, _, _, width] = dims;

    let positions = Tensor::<B, 1, Int>::arange(0..width as i64, &x.device())
        .reshape([1, width])
        .expand([batch, width]);
    let padded = positions
        .greater_equal(lengths.reshape([batch, 1]).expand([batch, width]))
        .reshape([batch, 1, 1, width])
        .expand(dims);

    x.mask_fill(padded, 0.0)
}
