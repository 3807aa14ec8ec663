use crate::error::CharNetError;
use crate::tensor::Tensor;

/// Computes the shape two operands broadcast to, numpy style: shapes are
/// aligned on their trailing dimensions and a dimension of size 1 (or a
/// missing leading dimension) stretches to match the other operand.
pub fn broadcast_shapes(
    shape1: &[usize],
    shape2: &[usize],
    operation: &str,
) -> Result<Vec<usize>, CharNetError> {
    let rank = shape1.len().max(shape2.len());
    let mut out = vec![0; rank];
    for i in 0..rank {
        // Walk from the trailing dimension backwards.
        let d1 = dim_from_end(shape1, rank - 1 - i);
        let d2 = dim_from_end(shape2, rank - 1 - i);
        out[i] = match (d1, d2) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(CharNetError::IncompatibleShapes {
                    operation: operation.to_string(),
                    shape1: shape1.to_vec(),
                    shape2: shape2.to_vec(),
                })
            }
        };
    }
    Ok(out)
}

/// Size of the dimension `back` positions from the end, 1 if the shape is shorter.
fn dim_from_end(shape: &[usize], back: usize) -> usize {
    if back < shape.len() {
        shape[shape.len() - 1 - back]
    } else {
        1
    }
}

/// Strides that map an index of `out_shape` into a contiguous tensor of
/// `shape`. Broadcast (size 1 or missing) dimensions get stride 0.
fn broadcast_strides(shape: &[usize], out_shape: &[usize]) -> Vec<usize> {
    let rank = out_shape.len();
    let offset = rank - shape.len();
    let mut strides = vec![0; rank];
    let mut acc = 1;
    for i in (0..shape.len()).rev() {
        if shape[i] != 1 {
            strides[offset + i] = acc;
        }
        acc *= shape[i];
    }
    strides
}

/// Visits every multi-index of `out_shape` in row-major order, passing the
/// matching flat offsets into tensors described by `strides_a` and `strides_b`.
fn for_each_broadcast<F: FnMut(usize, usize, usize)>(
    out_shape: &[usize],
    strides_a: &[usize],
    strides_b: &[usize],
    mut f: F,
) {
    let numel: usize = out_shape.iter().product();
    let rank = out_shape.len();
    let mut index = vec![0; rank];
    let (mut off_a, mut off_b) = (0, 0);
    for linear in 0..numel {
        f(linear, off_a, off_b);
        // Increment the multi-index like an odometer, keeping offsets in sync.
        let mut dim = rank;
        while dim > 0 {
            dim -= 1;
            index[dim] += 1;
            off_a += strides_a[dim];
            off_b += strides_b[dim];
            if index[dim] < out_shape[dim] {
                break;
            }
            off_a -= strides_a[dim] * index[dim];
            off_b -= strides_b[dim] * index[dim];
            index[dim] = 0;
        }
    }
}

/// Combines two tensors element-wise after broadcasting them to a common shape.
pub fn broadcast_zip<F: Fn(f64, f64) -> f64>(
    a: &Tensor,
    b: &Tensor,
    operation: &str,
    f: F,
) -> Result<Tensor, CharNetError> {
    if a.shape() == b.shape() {
        return a.zip_map(b, operation, f);
    }
    let out_shape = broadcast_shapes(a.shape(), b.shape(), operation)?;
    let strides_a = broadcast_strides(a.shape(), &out_shape);
    let strides_b = broadcast_strides(b.shape(), &out_shape);
    let numel: usize = out_shape.iter().product();
    let mut out = vec![0.0; numel];
    let (da, db) = (a.data(), b.data());
    for_each_broadcast(&out_shape, &strides_a, &strides_b, |i, ia, ib| {
        out[i] = f(da[ia], db[ib]);
    });
    Tensor::new(out, out_shape)
}

impl Tensor {
    /// Reduces the tensor (gradient) to match a target shape by summing along broadcasted dimensions.
    ///
    /// Crucial for backward pass of broadcasting ops: the gradient of an operand
    /// that was stretched during the forward pass is the upstream gradient summed
    /// over every stretched axis.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Tensor, CharNetError> {
        if self.shape() == target_shape {
            return Ok(self.clone());
        }
        let merged = broadcast_shapes(target_shape, self.shape(), "reduce_to_shape")?;
        if merged != self.shape() {
            return Err(CharNetError::IncompatibleShapes {
                operation: "reduce_to_shape".to_string(),
                shape1: self.shape().to_vec(),
                shape2: target_shape.to_vec(),
            });
        }
        let target_strides = broadcast_strides(target_shape, self.shape());
        let numel: usize = target_shape.iter().product();
        let mut out = vec![0.0; numel];
        let data = self.data();
        let zero_strides = vec![0; self.rank()];
        for_each_broadcast(self.shape(), &target_strides, &zero_strides, |i, it, _| {
            out[it] += data[i];
        });
        Tensor::new(out, target_shape.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_shapes_trailing() {
        assert_eq!(broadcast_shapes(&[4, 3], &[3], "t").unwrap(), vec![4, 3]);
        assert_eq!(broadcast_shapes(&[4, 1], &[1, 5], "t").unwrap(), vec![4, 5]);
        assert_eq!(broadcast_shapes(&[], &[2, 2], "t").unwrap(), vec![2, 2]);
        assert!(broadcast_shapes(&[4, 3], &[4], "t").is_err());
    }

    #[test]
    fn test_broadcast_zip_bias_row() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let b = Tensor::new(vec![10.0, 20.0, 30.0], vec![3]).unwrap();
        let c = broadcast_zip(&a, &b, "add", |x, y| x + y).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_broadcast_zip_column() {
        let a = Tensor::new(vec![1.0, 2.0], vec![2, 1]).unwrap();
        let b = Tensor::new(vec![10.0, 20.0, 30.0], vec![1, 3]).unwrap();
        let c = broadcast_zip(&a, &b, "add", |x, y| x + y).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.data(), &[11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
    }

    #[test]
    fn test_reduce_to_shape_sums_broadcast_axes() {
        let g = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let row = g.reduce_to_shape(&[3]).unwrap();
        assert_eq!(row.data(), &[5.0, 7.0, 9.0]);

        let col = g.reduce_to_shape(&[2, 1]).unwrap();
        assert_eq!(col.data(), &[6.0, 15.0]);

        let all = g.reduce_to_shape(&[]).unwrap();
        assert_eq!(all.item().unwrap(), 21.0);
    }

    #[test]
    fn test_reduce_to_shape_rejects_unrelated_shape() {
        let g = Tensor::new(vec![0.0; 6], vec![2, 3]).unwrap();
        assert!(g.reduce_to_shape(&[2]).is_err());
    }
}
