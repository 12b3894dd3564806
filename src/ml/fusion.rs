use burn::{prelude::*, tensor::activation::sigmoid};

/// Dual-sigmoid gate combining the two question vectors:
/// `sigmoid(x) ⊙ y + x ⊙ sigmoid(y)`.
///
/// `x` is the recurrent encoding and `y` the convolutional one;
/// both must have the same shape. There are no parameters.
pub fn dual_gate<B: Backend, const D: usize>(x: Tensor<B, D>, y: Tensor<B, D>) -> Tensor<B, D> {
    sigmoid(x.clone()) * y.clone() + x * sigmoid(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn sig(v: f32) -> f32 {
        1.0 / (1.0 + (-v).exp())
    }

    #[test]
    fn test_identical_inputs_closed_form() {
        let device = Default::default();
        let values = [-3.0f32, -0.5, 0.0, 0.25, 2.0, 7.5];
        let x      = Tensor::<TestBackend, 1>::from_floats(values, &device);

        let out: Vec<f32> = dual_gate(x.clone(), x).into_data().to_vec().unwrap();
        for (v, o) in values.iter().zip(&out) {
            let expected = 2.0 * v * sig(*v);
            assert!((o - expected).abs() < 1e-5, "gate({v}, {v}) = {o}, expected {expected}");
        }
    }

    #[test]
    fn test_mixed_inputs() {
        let device = Default::default();
        let x      = Tensor::<TestBackend, 2>::from_floats([[1.0, -2.0]], &device);
        let y      = Tensor::<TestBackend, 2>::from_floats([[0.5, 3.0]], &device);

        let out: Vec<f32> = dual_gate(x, y).into_data().to_vec().unwrap();
        let expected = [
            sig(1.0) * 0.5 + 1.0 * sig(0.5),
            sig(-2.0) * 3.0 + -2.0 * sig(3.0),
        ];
        for (o, e) in out.iter().zip(expected) {
            assert!((o - e).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_recurrent_branch_passes_half_of_other() {
        // x = 0: sigmoid(0) · y + 0 = y / 2
        let device = Default::default();
        let x      = Tensor::<TestBackend, 1>::zeros([3], &device);
        let y      = Tensor::<TestBackend, 1>::from_floats([4.0, -2.0, 1.0], &device);

        let out: Vec<f32> = dual_gate(x, y).into_data().to_vec().unwrap();
        assert_eq!(out, vec![2.0, -1.0, 0.5]);
    }
}
