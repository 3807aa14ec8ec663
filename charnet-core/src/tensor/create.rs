// src/tensor/create.rs

use crate::error::CharNetError;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Tensor {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Tensor {
    full(shape, 1.0)
}

/// Creates a new tensor filled with a specific value with the specified shape.
pub fn full(shape: &[usize], value: f64) -> Tensor {
    let numel = shape.iter().product();
    Tensor {
        data: vec![value; numel],
        shape: shape.to_vec(),
    }
}

/// Creates a tensor whose elements are drawn uniformly from `[low, high]`.
///
/// # Errors
/// Returns `IncompatibleShapes` when `low > high` or either bound is not
/// finite (the bounds are reported in the operation name).
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor, CharNetError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(CharNetError::IncompatibleShapes {
            operation: format!("rand_uniform(low={}, high={})", low, high),
            shape1: shape.to_vec(),
            shape2: shape.to_vec(),
        });
    }
    let numel: usize = shape.iter().product();
    let dist = Uniform::new_inclusive(low, high);
    let data_vec: Vec<f64> = (0..numel).map(|_| dist.sample(rng)).collect();
    Tensor::new(data_vec, shape.to_vec())
}
