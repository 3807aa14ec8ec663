use crate::tensor::{rand_uniform, Tensor};
use rand::Rng;

/// Checks if two tensors are approximately equal (shape and data within tolerance).
/// Panics if shapes differ or data differs significantly.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    assert_eq!(
        actual.data().len(),
        expected_data.len(),
        "Data length mismatch"
    );
    for (i, (a, e)) in actual.data().iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Tensor with elements drawn uniformly from `[-1, 1]`.
pub fn random_tensor<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Tensor {
    match rand_uniform(shape, -1.0, 1.0, rng) {
        Ok(t) => t,
        Err(e) => panic!("random_tensor({:?}) failed: {}", shape, e),
    }
}
