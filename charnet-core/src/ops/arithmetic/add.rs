use crate::error::CharNetError;
use crate::tensor::broadcast_utils::broadcast_zip;
use crate::tensor::Tensor;

/// Element-wise addition with numpy broadcasting.
///
/// The usual use is the bias add `(batch, n) + (n,)`, where the bias row is
/// stretched over every example of the batch.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, CharNetError> {
    broadcast_zip(a, b, "add", |x, y| x + y)
}

/// The gradient of addition is the upstream gradient itself, summed back over
/// whichever axes each operand was broadcast along.
pub fn add_backward(
    grad_output: &Tensor,
    a_shape: &[usize],
    b_shape: &[usize],
) -> Result<(Tensor, Tensor), CharNetError> {
    let grad_a = grad_output.reduce_to_shape(a_shape)?;
    let grad_b = grad_output.reduce_to_shape(b_shape)?;
    Ok((grad_a, grad_b))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
