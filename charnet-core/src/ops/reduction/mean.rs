use crate::error::CharNetError;
use crate::tensor::{full, Tensor};

/// Arithmetic mean over every element, returned as a rank-0 tensor.
pub fn mean_op(input: &Tensor) -> Result<Tensor, CharNetError> {
    if input.numel() == 0 {
        return Err(CharNetError::ShapeMismatch {
            expected: vec![1],
            actual: input.shape().to_vec(),
            operation: "mean (empty input)".to_string(),
        });
    }
    Ok(Tensor::scalar(input.sum() / input.numel() as f64))
}

/// Broadcasts `g / N` back to every element of the input.
pub fn mean_backward(grad_output: &Tensor, input_shape: &[usize]) -> Result<Tensor, CharNetError> {
    let g = grad_output.item()?;
    let n: usize = input_shape.iter().product();
    Ok(full(input_shape, g / n as f64))
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
