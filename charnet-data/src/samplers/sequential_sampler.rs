// charnet-data/src/samplers/sequential_sampler.rs

use super::traits::Sampler;

/// Visits examples in file order every epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}
