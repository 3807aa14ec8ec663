// Declares the main modules of the crate
pub mod autograd;
pub mod error;
pub mod metrics;
pub mod nn;
pub mod ops;
pub mod tensor;
#[cfg(test)]
pub(crate) mod utils;

// Re-export the core types so they are reachable as `charnet_core::Tensor`, etc.
pub use autograd::{GradMap, Graph, NodeKind, ValueEnv};
pub use error::CharNetError;
pub use nn::{Mlp, Network};
pub use ops::OpKind;
pub use tensor::Tensor;
