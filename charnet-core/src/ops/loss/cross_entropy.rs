use crate::error::CharNetError;
use crate::ops::activation::softmax::row_layout;
use crate::tensor::Tensor;

/// Added to probabilities before taking the log so that `log(0)` never happens.
pub const LOG_FLOOR: f64 = 1e-10;

fn check_pair(probs: &Tensor, labels: &Tensor, operation: &str) -> Result<(usize, usize), CharNetError> {
    if probs.shape() != labels.shape() {
        return Err(CharNetError::ShapeMismatch {
            expected: probs.shape().to_vec(),
            actual: labels.shape().to_vec(),
            operation: operation.to_string(),
        });
    }
    row_layout(probs, operation)
}

/// Per-row shape of a reduction over the last axis.
fn row_shape(t: &Tensor) -> Vec<usize> {
    t.shape()[..t.rank() - 1].to_vec()
}

/// Row-wise cross-entropy `-sum(Y * log(P + floor))` over the last axis.
/// A `(batch, classes)` input gives a `(batch,)` output.
pub fn cross_entropy_op(probs: &Tensor, labels: &Tensor) -> Result<Tensor, CharNetError> {
    let (rows, cols) = check_pair(probs, labels, "crossEnt")?;
    let p = probs.data();
    let y = labels.data();
    let out: Vec<f64> = (0..rows)
        .map(|r| {
            -(r * cols..(r + 1) * cols)
                .map(|i| y[i] * (p[i] + LOG_FLOOR).ln())
                .sum::<f64>()
        })
        .collect();
    Tensor::new(out, row_shape(probs))
}

/// Per-row upstream gradient broadcast over the class axis.
fn row_grad(grad_output: &Tensor, probs: &Tensor, operation: &str) -> Result<Vec<f64>, CharNetError> {
    let expected = row_shape(probs);
    if grad_output.shape() != expected.as_slice() {
        return Err(CharNetError::ShapeMismatch {
            expected,
            actual: grad_output.shape().to_vec(),
            operation: operation.to_string(),
        });
    }
    Ok(grad_output.data().to_vec())
}

/// Separate gradients with respect to `P` and `Y`:
/// `dP = -g * Y / (P + floor)`, `dY = -g * log(P + floor)`.
pub fn cross_entropy_backward(
    grad_output: &Tensor,
    probs: &Tensor,
    labels: &Tensor,
) -> Result<(Tensor, Tensor), CharNetError> {
    let (rows, cols) = check_pair(probs, labels, "crossEnt_backward")?;
    let g = row_grad(grad_output, probs, "crossEnt_backward")?;
    let p = probs.data();
    let y = labels.data();
    let mut dp = vec![0.0; p.len()];
    let mut dy = vec![0.0; p.len()];
    for r in 0..rows {
        for i in r * cols..(r + 1) * cols {
            let shifted = p[i] + LOG_FLOOR;
            dp[i] = -g[r] * y[i] / shifted;
            dy[i] = -g[r] * shifted.ln();
        }
    }
    Ok((
        Tensor::new(dp, probs.shape().to_vec())?,
        Tensor::new(dy, labels.shape().to_vec())?,
    ))
}

/// Gradient of `crossEnt(softMax(Z), Y)` with respect to the logits `Z`,
/// given the softmax output `P`: `dZ = g * (P * rowsum(Y) - Y)`.
///
/// For one-hot or otherwise normalised labels `rowsum(Y) = 1` and this is the
/// familiar `P - Y`. Also returns the gradient with respect to `Y`.
pub fn softmax_cross_entropy_backward(
    grad_output: &Tensor,
    probs: &Tensor,
    labels: &Tensor,
) -> Result<(Tensor, Tensor), CharNetError> {
    let (rows, cols) = check_pair(probs, labels, "softMax_crossEnt_backward")?;
    let g = row_grad(grad_output, probs, "softMax_crossEnt_backward")?;
    let p = probs.data();
    let y = labels.data();
    let mut dz = vec![0.0; p.len()];
    let mut dy = vec![0.0; p.len()];
    for r in 0..rows {
        let span = r * cols..(r + 1) * cols;
        let label_mass: f64 = y[span.clone()].iter().sum();
        for i in span {
            dz[i] = g[r] * (p[i] * label_mass - y[i]);
            dy[i] = -g[r] * (p[i] + LOG_FLOOR).ln();
        }
    }
    Ok((
        Tensor::new(dz, probs.shape().to_vec())?,
        Tensor::new(dy, labels.shape().to_vec())?,
    ))
}

#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
