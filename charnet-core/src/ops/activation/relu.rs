use crate::error::CharNetError;
use crate::tensor::Tensor;

/// Applies the Rectified Linear Unit (ReLU) activation function element-wise.
/// ReLU(x) = max(0, x)
pub fn relu_op(input: &Tensor) -> Result<Tensor, CharNetError> {
    Ok(input.map(|x| if x > 0.0 { x } else { 0.0 }))
}

/// grad = upstream_grad * (input > 0). An input of exactly 0 passes no gradient.
pub fn relu_backward(grad_output: &Tensor, input: &Tensor) -> Result<Tensor, CharNetError> {
    grad_output.zip_map(input, "relu_backward", |g, x| if x > 0.0 { g } else { 0.0 })
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
