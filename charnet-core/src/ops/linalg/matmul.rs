// Ce module contient la multiplication matricielle et son gradient.

use crate::error::CharNetError;
use crate::tensor::Tensor;

/// Performs matrix multiplication C = A @ B.
/// Currently supports only 2D tensors (matrices).
/// A: [M, K], B: [K, N] -> C: [M, N]
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, CharNetError> {
    if a.rank() != 2 || b.rank() != 2 {
        return Err(CharNetError::ShapeMismatch {
            expected: vec![2, 2],
            actual: vec![a.rank(), b.rank()],
            operation: "matmul (rank check)".to_string(),
        });
    }
    let (m, k) = a.dims2("matmul")?;
    let (k2, n) = b.dims2("matmul")?;
    if k != k2 {
        return Err(CharNetError::ShapeMismatch {
            expected: vec![k, n],
            actual: b.shape().to_vec(),
            operation: "matmul (inner dim)".to_string(),
        });
    }

    let a_data = a.data();
    let b_data = b.data();
    let mut output_data = vec![0.0; m * n];
    // i-k-j loop order keeps the inner loop on contiguous rows of B and C.
    for i in 0..m {
        for p in 0..k {
            let a_ip = a_data[i * k + p];
            let b_row = &b_data[p * n..(p + 1) * n];
            let c_row = &mut output_data[i * n..(i + 1) * n];
            for (c, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c += a_ip * b_pj;
            }
        }
    }
    Tensor::new(output_data, vec![m, n])
}

/// Gradients of `C = A @ B` given `dC`: `dA = dC @ B^T`, `dB = A^T @ dC`.
pub fn matmul_backward(
    grad_output: &Tensor,
    a: &Tensor,
    b: &Tensor,
) -> Result<(Tensor, Tensor), CharNetError> {
    let grad_a = matmul_op(grad_output, &b.transpose()?)?;
    let grad_b = matmul_op(&a.transpose()?, grad_output)?;
    Ok((grad_a, grad_b))
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
