// ============================================================
// Layer 5 — Forward Mode
// ============================================================
// Every forward pass in this crate takes an explicit Mode.
// Dropout is only applied in Mode::Train; Mode::Eval is the
// identity. Nothing is stored on the modules themselves, so the
// same model instance can be used for a training step and an
// evaluation pass back to back without toggling any state.
//
// Reference: Srivastava et al. (2014) Dropout
//            Burn Book §3 (Modules)

use burn::{
    nn::Dropout,
    prelude::*,
    tensor::Distribution,
};

/// Whether a forward pass is part of training or evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stochastic layers are active
    Train,
    /// Stochastic layers are the identity
    Eval,
}

impl Mode {
    pub fn is_train(self) -> bool {
        matches!(self, Mode::Train)
    }
}

/// Apply `dropout` to `x` when `mode` is `Train`.
///
/// Inverted dropout: surviving activations are scaled by
/// `1 / (1 - p)` so evaluation needs no rescaling.
pub fn dropout<B: Backend, const D: usize>(
    layer: &Dropout,
    x:     Tensor<B, D>,
    mode:  Mode,
) -> Tensor<B, D> {
    if !mode.is_train() || layer.prob == 0.0 {
        return x;
    }

    // Bernoulli(p) marks the activations to drop
    let dropped = x.random_like(Distribution::Bernoulli(layer.prob)).equal_elem(1.0);
    x.mask_fill(dropped, 0.0) * (1.0 / (1.0 - layer.prob))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::nn::DropoutConfig;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_eval_mode_is_identity() {
        let device = Default::default();
        let layer  = DropoutConfig::new(0.5).init();
        let x      = Tensor::<TestBackend, 2>::ones([4, 8], &device);

        let y: Vec<f32> = dropout(&layer, x, Mode::Eval)
            .into_data().to_vec().unwrap();
        assert!(y.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_train_mode_zeroes_or_rescales() {
        let device = Default::default();
        let layer  = DropoutConfig::new(0.5).init();
        let x      = Tensor::<TestBackend, 2>::ones([16, 16], &device);

        let y: Vec<f32> = dropout(&layer, x, Mode::Train)
            .into_data().to_vec().unwrap();
        // Every value is either dropped or scaled by 1 / (1 - 0.5)
        assert!(y.iter().all(|&v| v == 0.0 || (v - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_zero_probability_never_drops() {
        let device = Default::default();
        let layer  = DropoutConfig::new(0.0).init();
        let x      = Tensor::<TestBackend, 1>::ones([32], &device);

        let y: Vec<f32> = dropout(&layer, x, Mode::Train)
            .into_data().to_vec().unwrap();
        assert!(y.iter().all(|&v| v == 1.0));
    }
}
