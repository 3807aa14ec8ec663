// charnet-data/src/samplers/traits.rs

use std::fmt::Debug;

/// Decides the order in which a loader visits examples.
///
/// A loader asks for a fresh permutation at the start of every epoch.
pub trait Sampler: Debug {
    /// Returns every index in `0..len` exactly once, in visiting order.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}
