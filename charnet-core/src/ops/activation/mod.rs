// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! Non-linearities applied element-wise (ReLU) or row-wise (softmax).

pub mod relu;
pub mod softmax;

// Re-export key functions
pub use relu::{relu_backward, relu_op};
pub use softmax::{softmax_backward, softmax_op};
