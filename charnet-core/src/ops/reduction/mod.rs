// src/ops/reduction/mod.rs
// Module pour les opérations de réduction (Mean, etc.)

pub mod mean;

pub use mean::{mean_backward, mean_op};
