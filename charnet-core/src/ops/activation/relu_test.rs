use super::*;
use crate::autograd::grad_check::check_op_grad;
use crate::ops::OpKind;
use crate::utils::testing::random_tensor;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_relu_forward() {
    let input = Tensor::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0], vec![5]).unwrap();
    let expected = [0.0, 0.0, 0.0, 1.0, 2.0];
    let output = relu_op(&input).unwrap();
    assert_eq!(output.shape(), &[5]);
    output
        .data()
        .iter()
        .zip(expected.iter())
        .for_each(|(o, e)| assert_relative_eq!(*o, *e));
}

#[test]
fn test_relu_backward_masks_non_positive() {
    let input = Tensor::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0], vec![5]).unwrap();
    let grad = Tensor::new(vec![5.0, 5.0, 5.0, 5.0, 5.0], vec![5]).unwrap();
    let dx = relu_backward(&grad, &input).unwrap();
    // Ties at exactly zero propagate nothing.
    assert_eq!(dx.data(), &[0.0, 0.0, 0.0, 5.0, 5.0]);
}

#[test]
fn test_relu_grad_check_random_configs() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..20 {
        let (rows, cols) = (rng.gen_range(1..5), rng.gen_range(1..6));
        // Keep elements away from the kink so finite differences stay one-sided-free.
        let x = random_tensor(&[rows, cols], &mut rng)
            .map(|v| if v.abs() < 0.05 { v.signum() * 0.1 + v } else { v });
        let output_grad = random_tensor(&[rows, cols], &mut rng);
        let result = check_op_grad(OpKind::Relu, &[x], &output_grad, 1e-4, 1e-3);
        assert!(result.is_ok(), "relu grad check failed: {:?}", result.err());
    }
}
