//! # Operation Library (`ops`)
//!
//! The closed catalog of differentiable primitives the graph can evaluate.
//!
//! ## Structure:
//!
//! - **Submodules:** Operations are grouped logically (`activation`, `arithmetic`,
//!   `linalg`, `loss`, `reduction`).
//! - **`_op` / `_backward` functions:** Each operation has a pure forward function
//!   (`xxx_op`) and a gradient function (`xxx_backward`) that returns one gradient
//!   per operand, each with the operand's exact shape.
//! - **[`OpKind`]:** The tag stored in graph nodes. It dispatches to the functions
//!   above and knows each operator's arity.

use crate::error::CharNetError;
use crate::tensor::Tensor;
use std::fmt;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod loss;
pub mod reduction;

/// Identifier of a differentiable operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `matmul(A, B)`: 2-D matrix product.
    MatMul,
    /// `add(A, B)`: element-wise add with broadcasting.
    Add,
    /// `relu(X)`: element-wise `max(0, X)`.
    Relu,
    /// `softMax(X)`: row-wise, max-shifted softmax.
    SoftMax,
    /// `crossEnt(P, Y)`: row-wise `-sum(Y * log(P + floor))`.
    CrossEnt,
    /// `mean(X)`: scalar mean over all elements.
    Mean,
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::MatMul => "matmul",
            OpKind::Add => "add",
            OpKind::Relu => "relu",
            OpKind::SoftMax => "softMax",
            OpKind::CrossEnt => "crossEnt",
            OpKind::Mean => "mean",
        }
    }

    /// Number of operands the operator takes.
    pub fn arity(&self) -> usize {
        match self {
            OpKind::MatMul | OpKind::Add | OpKind::CrossEnt => 2,
            OpKind::Relu | OpKind::SoftMax | OpKind::Mean => 1,
        }
    }

    fn check_arity(&self, actual: usize) -> Result<(), CharNetError> {
        if actual != self.arity() {
            return Err(CharNetError::ArityMismatch {
                operation: self.name().to_string(),
                expected: self.arity(),
                actual,
            });
        }
        Ok(())
    }

    /// Evaluates the operator on concrete operand values.
    pub fn forward(&self, operands: &[&Tensor]) -> Result<Tensor, CharNetError> {
        self.check_arity(operands.len())?;
        match self {
            OpKind::MatMul => linalg::matmul_op(operands[0], operands[1]),
            OpKind::Add => arithmetic::add_op(operands[0], operands[1]),
            OpKind::Relu => activation::relu_op(operands[0]),
            OpKind::SoftMax => activation::softmax_op(operands[0]),
            OpKind::CrossEnt => loss::cross_entropy_op(operands[0], operands[1]),
            OpKind::Mean => reduction::mean_op(operands[0]),
        }
    }

    /// Computes the gradient contribution for every operand, in operand order.
    ///
    /// `output` is the value the forward rule produced for these operands.
    pub fn backward(
        &self,
        grad_output: &Tensor,
        operands: &[&Tensor],
        output: &Tensor,
    ) -> Result<Vec<Tensor>, CharNetError> {
        self.check_arity(operands.len())?;
        if grad_output.shape() != output.shape() {
            return Err(CharNetError::ShapeMismatch {
                expected: output.shape().to_vec(),
                actual: grad_output.shape().to_vec(),
                operation: format!("{} (upstream gradient)", self.name()),
            });
        }
        let grads = match self {
            OpKind::MatMul => {
                let (da, db) = linalg::matmul_backward(grad_output, operands[0], operands[1])?;
                vec![da, db]
            }
            OpKind::Add => {
                let (da, db) =
                    arithmetic::add_backward(grad_output, operands[0].shape(), operands[1].shape())?;
                vec![da, db]
            }
            OpKind::Relu => vec![activation::relu_backward(grad_output, operands[0])?],
            OpKind::SoftMax => vec![activation::softmax_backward(grad_output, output)?],
            OpKind::CrossEnt => {
                let (dp, dy) = loss::cross_entropy_backward(grad_output, operands[0], operands[1])?;
                vec![dp, dy]
            }
            OpKind::Mean => vec![reduction::mean_backward(grad_output, operands[0].shape())?],
        };
        Ok(grads)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
