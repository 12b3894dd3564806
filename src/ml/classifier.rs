use burn::{
    nn::{Dropout, DropoutConfig, Linear},
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::init;
use crate::ml::mode::{self, Mode};

/// Answer head: dropout → linear → ReLU → dropout → linear.
/// Outputs raw scores; the loss and arg-max live elsewhere.
#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    lin1:    Linear<B>,
    lin2:    Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> Classifier<B> {
    pub fn new(
        in_features:  usize,
        mid_features: usize,
        out_features: usize,
        drop:         f64,
        device:       &B::Device,
    ) -> Self {
        Self {
            lin1:    init::linear(in_features, mid_features, true, device),
            lin2:    init::linear(mid_features, out_features, true, device),
            dropout: DropoutConfig::new(drop).init(),
        }
    }

    /// [n, in_features] → [n, out_features]
    pub fn forward(&self, x: Tensor<B, 2>, mode: Mode) -> Tensor<B, 2> {
        let x = self.lin1.forward(mode::dropout(&self.dropout, x, mode));
        let x = relu(x);
        self.lin2.forward(mode::dropout(&self.dropout, x, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_output_shape() {
        let device     = Default::default();
        let classifier = Classifier::<TestBackend>::new(12, 6, 4, 0.5, &device);
        let x          = Tensor::<TestBackend, 2>::ones([3, 12], &device);

        assert_eq!(classifier.forward(x, Mode::Eval).dims(), [3, 4]);
    }

    #[test]
    fn test_zero_input_gives_zero_scores() {
        // All biases start at zero, so a zero input maps to zero scores
        let device     = Default::default();
        let classifier = Classifier::<TestBackend>::new(5, 3, 2, 0.5, &device);
        let x          = Tensor::<TestBackend, 2>::zeros([1, 5], &device);

        let out: Vec<f32> = classifier.forward(x, Mode::Eval).into_data().to_vec().unwrap();
        assert_eq!(out, vec![0.0, 0.0]);
    }
}
