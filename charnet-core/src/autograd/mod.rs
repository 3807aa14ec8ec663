//! Name-keyed computation graph and the finite-difference checker that validates it.

pub mod grad_check;
pub mod graph;

pub use grad_check::{check_op_grad, grad_check, grad_check_with};
pub use graph::{GradMap, Graph, Node, NodeKind, ValueEnv};
