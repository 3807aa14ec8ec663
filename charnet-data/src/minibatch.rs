//! # Minibatch loader
//!
//! Walks a list of [`Example`]s in the order chosen by a [`Sampler`] and
//! encodes each slice as dense tensors:
//!
//! - features: one-hot characters, `(batch, max_len, num_chars)`, truncated
//!   to `max_len` characters and zero-padded after the entity ends;
//! - labels: multi-hot, `(batch, num_labels)`.
//!
//! The last batch of an epoch may be shorter. After it, the loader reports
//! [`Fetch::EpochEnd`] once and starts a new epoch with a fresh permutation.

use crate::dataset::Example;
use crate::error::DataError;
use crate::samplers::Sampler;
use charnet_core::Tensor;
use log::debug;

/// One encoded minibatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Minibatch {
    /// Original file row of every example in the batch.
    pub indices: Vec<usize>,
    /// One-hot characters, `(batch, max_len, num_chars)`.
    pub features: Tensor,
    /// Multi-hot labels, `(batch, num_labels)`.
    pub labels: Tensor,
}

impl Minibatch {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Features reshaped to `(batch, max_len * num_chars)`.
    pub fn flat_features(&self) -> Result<Tensor, DataError> {
        let shape = self.features.shape();
        let width = shape[1..].iter().product();
        Ok(self.features.reshape(vec![shape[0], width])?)
    }
}

/// Result of asking the loader for the next batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Batch(Minibatch),
    /// The epoch is exhausted. The loader has already been reset.
    EpochEnd,
}

/// Minibatch generator over an owned example list.
#[derive(Debug)]
pub struct MinibatchLoader<S: Sampler> {
    examples: Vec<Example>,
    batch_size: usize,
    max_len: usize,
    num_chars: usize,
    num_labels: usize,
    sampler: S,
    permutation: Vec<usize>,
    ptr: usize,
}

impl<S: Sampler> MinibatchLoader<S> {
    /// # Errors
    /// `InvalidBatchSize` when `batch_size` is 0.
    pub fn new(
        examples: Vec<Example>,
        batch_size: usize,
        max_len: usize,
        num_chars: usize,
        num_labels: usize,
        sampler: S,
    ) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::InvalidBatchSize { batch_size });
        }
        let mut loader = MinibatchLoader {
            examples,
            batch_size,
            max_len,
            num_chars,
            num_labels,
            sampler,
            permutation: Vec::new(),
            ptr: 0,
        };
        loader.reset();
        Ok(loader)
    }

    /// Starts a new epoch with a fresh permutation.
    pub fn reset(&mut self) {
        self.permutation = self.sampler.permutation(self.examples.len());
        self.ptr = 0;
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Returns the next batch, or `EpochEnd` (and resets) once every example
    /// of the epoch has been served.
    pub fn next_batch(&mut self) -> Result<Fetch, DataError> {
        let total = self.examples.len();
        if self.ptr >= total {
            debug!("epoch over after {} example(s)", total);
            self.reset();
            return Ok(Fetch::EpochEnd);
        }
        let start = self.ptr;
        let size = self.batch_size.min(total - start);
        self.ptr += size;
        let (max_len, num_chars, num_labels) = (self.max_len, self.num_chars, self.num_labels);

        let mut indices = Vec::with_capacity(size);
        let mut features = vec![0.0; size * max_len * num_chars];
        let mut labels = vec![0.0; size * num_labels];
        for n in 0..size {
            let example = &self.examples[self.permutation[start + n]];
            indices.push(example.index);
            for (pos, &c) in example.chars.iter().take(max_len).enumerate() {
                if c >= num_chars {
                    return Err(DataError::IndexOutOfRange {
                        what: "character table",
                        index: c,
                        len: num_chars,
                    });
                }
                features[(n * max_len + pos) * num_chars + c] = 1.0;
            }
            for &l in &example.labels {
                if l >= num_labels {
                    return Err(DataError::IndexOutOfRange {
                        what: "label table",
                        index: l,
                        len: num_labels,
                    });
                }
                labels[n * num_labels + l] = 1.0;
            }
        }

        Ok(Fetch::Batch(Minibatch {
            indices,
            features: Tensor::new(features, vec![size, max_len, num_chars])?,
            labels: Tensor::new(labels, vec![size, num_labels])?,
        }))
    }

    /// Iterator over the remaining batches of the current epoch. It stops at
    /// the epoch boundary, leaving the loader ready for the next epoch.
    pub fn epoch(&mut self) -> Epoch<'_, S> {
        Epoch { loader: self }
    }
}

/// Batches of one epoch, see [`MinibatchLoader::epoch`].
#[derive(Debug)]
pub struct Epoch<'a, S: Sampler> {
    loader: &'a mut MinibatchLoader<S>,
}

impl<S: Sampler> Iterator for Epoch<'_, S> {
    type Item = Result<Minibatch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.loader.next_batch() {
            Ok(Fetch::Batch(batch)) => Some(Ok(batch)),
            Ok(Fetch::EpochEnd) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "minibatch_test.rs"]
mod tests;
