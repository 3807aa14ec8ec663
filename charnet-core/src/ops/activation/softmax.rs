use crate::error::CharNetError;
use crate::tensor::Tensor;

/// Splits a tensor of rank >= 1 into `(rows, cols)` where `cols` is the last axis.
pub(crate) fn row_layout(t: &Tensor, operation: &str) -> Result<(usize, usize), CharNetError> {
    match t.shape().last() {
        Some(&cols) if cols > 0 => Ok((t.numel() / cols, cols)),
        _ => Err(CharNetError::ShapeMismatch {
            expected: vec![1],
            actual: t.shape().to_vec(),
            operation: operation.to_string(),
        }),
    }
}

/// Row-wise softmax over the last axis.
///
/// The row maximum is subtracted before exponentiating, so large logits do not
/// overflow; every output row sums to 1.
pub fn softmax_op(input: &Tensor) -> Result<Tensor, CharNetError> {
    let (rows, cols) = row_layout(input, "softMax")?;
    let x = input.data();
    let mut out = vec![0.0; x.len()];
    for r in 0..rows {
        let row = &x[r * cols..(r + 1) * cols];
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let dst = &mut out[r * cols..(r + 1) * cols];
        let mut total = 0.0;
        for (d, &v) in dst.iter_mut().zip(row) {
            *d = (v - max).exp();
            total += *d;
        }
        for d in dst.iter_mut() {
            *d /= total;
        }
    }
    Tensor::new(out, input.shape().to_vec())
}

/// Jacobian-vector product of softmax: `dX = P * (g - rowsum(g * P))`.
///
/// Only used when the softmax output feeds something other than a directly
/// attached `crossEnt`; that pair is differentiated as one unit by the graph.
pub fn softmax_backward(grad_output: &Tensor, output: &Tensor) -> Result<Tensor, CharNetError> {
    if grad_output.shape() != output.shape() {
        return Err(CharNetError::ShapeMismatch {
            expected: output.shape().to_vec(),
            actual: grad_output.shape().to_vec(),
            operation: "softMax_backward".to_string(),
        });
    }
    let (rows, cols) = row_layout(output, "softMax_backward")?;
    let g = grad_output.data();
    let p = output.data();
    let mut out = vec![0.0; p.len()];
    for r in 0..rows {
        let span = r * cols..(r + 1) * cols;
        let dot: f64 = g[span.clone()].iter().zip(&p[span.clone()]).map(|(a, b)| a * b).sum();
        for i in span {
            out[i] = p[i] * (g[i] - dot);
        }
    }
    Tensor::new(out, output.shape().to_vec())
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
