// src/nn/mod.rs
// Models expressed as graphs, plus their initialisation helpers.

pub mod init;
pub mod mlp;
pub mod network; // Trait Network

// Re-export common items
pub use mlp::Mlp;
pub use network::Network;
