// src/tensor/mod.rs

use crate::error::CharNetError;

pub mod create; // Make the create module public
pub mod broadcast_utils;

pub use create::{full, ones, rand_uniform, zeros};

/// Represents a multi-dimensional array (tensor).
///
/// Storage is a contiguous, row-major `Vec<f64>`. A rank-0 tensor (empty shape)
/// holds exactly one element and plays the role of a scalar. Values carry no
/// autograd metadata: gradients live in a separate name-keyed map produced by
/// [`Graph::backward`](crate::autograd::Graph::backward).
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Creates a new Tensor with the given data and shape.
    ///
    /// # Errors
    /// Returns `TensorCreationError` if the data length does not match the
    /// product of the shape dimensions.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, CharNetError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(CharNetError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Tensor { data, shape })
    }

    /// Creates a rank-0 tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            data: vec![value],
            shape: Vec::new(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the flattened elements, used for in-place
    /// perturbation and parameter updates.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Returns the single element of a one-element tensor.
    pub fn item(&self) -> Result<f64, CharNetError> {
        if self.data.len() != 1 {
            return Err(CharNetError::ShapeMismatch {
                expected: Vec::new(),
                actual: self.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(self.data[0])
    }

    /// Returns a tensor with the same data and a new shape of equal element count.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Tensor, CharNetError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(CharNetError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: shape,
                operation: "reshape".to_string(),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            shape,
        })
    }

    /// Returns `(rows, cols)` for a rank-2 tensor.
    pub fn dims2(&self, operation: &str) -> Result<(usize, usize), CharNetError> {
        match self.shape.as_slice() {
            [r, c] => Ok((*r, *c)),
            _ => Err(CharNetError::IncompatibleShapes {
                operation: operation.to_string(),
                shape1: self.shape.clone(),
                shape2: vec![0, 0],
            }),
        }
    }

    /// Matrix transpose of a rank-2 tensor.
    pub fn transpose(&self) -> Result<Tensor, CharNetError> {
        let (rows, cols) = self.dims2("transpose")?;
        let mut out = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                out[j * rows + i] = self.data[i * cols + j];
            }
        }
        Tensor::new(out, vec![cols, rows])
    }

    /// Applies `f` element-wise.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Combines two tensors of identical shape element-wise.
    pub fn zip_map<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Tensor,
        operation: &str,
        f: F,
    ) -> Result<Tensor, CharNetError> {
        if self.shape != other.shape {
            return Err(CharNetError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
                operation: operation.to_string(),
            });
        }
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            shape: self.shape.clone(),
        })
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Index of the largest element of each row of a rank-2 tensor.
    /// Ties resolve to the first index.
    pub fn argmax_rows(&self) -> Result<Vec<usize>, CharNetError> {
        let (rows, cols) = self.dims2("argmax_rows")?;
        Ok((0..rows)
            .map(|r| {
                let row = &self.data[r * cols..(r + 1) * cols];
                let mut best = 0;
                for (j, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect())
    }

    /// Stacks rank-2 tensors with equal column counts on top of each other.
    pub fn vstack(tensors: &[Tensor]) -> Result<Tensor, CharNetError> {
        let first = match tensors.first() {
            Some(t) => t,
            None => return Tensor::new(Vec::new(), vec![0, 0]),
        };
        let (_, cols) = first.dims2("vstack")?;
        let mut rows = 0;
        let mut data = Vec::new();
        for t in tensors {
            let (r, c) = t.dims2("vstack")?;
            if c != cols {
                return Err(CharNetError::IncompatibleShapes {
                    operation: "vstack".to_string(),
                    shape1: first.shape.clone(),
                    shape2: t.shape.clone(),
                });
            }
            rows += r;
            data.extend_from_slice(&t.data);
        }
        Tensor::new(data, vec![rows, cols])
    }
}

#[cfg(test)]
#[path = "tensor_test.rs"]
mod tests;
