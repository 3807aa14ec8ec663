use super::*;
use crate::autograd::grad_check::check_op_grad;
use crate::ops::OpKind;
use crate::utils::testing::random_tensor;
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_softmax_rows_sum_to_one() {
    let x = Tensor::new(vec![1.0, 2.0, 3.0, -1.0, 0.0, 1.0], vec![2, 3]).unwrap();
    let p = softmax_op(&x).unwrap();
    for row in p.data().chunks(3) {
        assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
    // Shift invariance: both rows differ by a constant.
    assert_abs_diff_eq!(p.data()[0], p.data()[3], epsilon = 1e-12);
}

#[test]
fn test_softmax_is_stable_for_large_logits() {
    let x = Tensor::new(vec![1000.0, 1000.0, 990.0], vec![1, 3]).unwrap();
    let p = softmax_op(&x).unwrap();
    assert!(p.data().iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(p.data()[0], p.data()[1], epsilon = 1e-12);
    assert_abs_diff_eq!(p.sum(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_softmax_rejects_scalar() {
    assert!(softmax_op(&Tensor::scalar(1.0)).is_err());
}

#[test]
fn test_softmax_grad_check_random_configs() {
    let mut rng = StdRng::seed_from_u64(41);
    for _ in 0..20 {
        let (rows, cols) = (rng.gen_range(1..4), rng.gen_range(2..6));
        let x = random_tensor(&[rows, cols], &mut rng);
        let output_grad = random_tensor(&[rows, cols], &mut rng);
        let result = check_op_grad(OpKind::SoftMax, &[x], &output_grad, 1e-4, 1e-3);
        assert!(result.is_ok(), "softMax grad check failed: {:?}", result.err());
    }
}
