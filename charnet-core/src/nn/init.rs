use crate::error::CharNetError;
use crate::tensor::{rand_uniform, Tensor};
use rand::Rng;

/// Glorot (Xavier) uniform scale for a `(fan_in, fan_out)` weight matrix:
/// `sqrt(6 / (fan_in + fan_out))`.
pub fn glorot(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}

/// Draws a tensor uniformly from `[-scale, scale]`.
pub fn uniform_symmetric<R: Rng + ?Sized>(
    shape: &[usize],
    scale: f64,
    rng: &mut R,
) -> Result<Tensor, CharNetError> {
    rand_uniform(shape, -scale, scale, rng)
}

/// Weight matrix `(fan_in, fan_out)` drawn from `±glorot(fan_in, fan_out)`.
pub fn glorot_uniform<R: Rng + ?Sized>(
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
) -> Result<Tensor, CharNetError> {
    uniform_symmetric(&[fan_in, fan_out], glorot(fan_in, fan_out), rng)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
