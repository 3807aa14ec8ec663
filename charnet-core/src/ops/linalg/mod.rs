// src/ops/linalg/mod.rs

pub mod matmul;

pub use matmul::{matmul_backward, matmul_op};
