// src/ops/loss/mod.rs

//! # Loss Functions
//!
//! Row-wise categorical cross-entropy, plus the fused gradient used when the
//! probabilities come straight out of a softmax.

pub mod cross_entropy;

pub use cross_entropy::{
    cross_entropy_backward, cross_entropy_op, softmax_cross_entropy_backward, LOG_FLOOR,
};
