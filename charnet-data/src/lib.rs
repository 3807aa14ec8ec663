//! Dataset handling for the character-level classifier: text cleaning,
//! vocabulary construction, row parsing, minibatch assembly and prediction
//! files.

pub mod clean;
pub mod dataset;
pub mod error;
pub mod minibatch;
pub mod predictions;
pub mod preprocessor;
pub mod samplers;
pub mod vocabulary;

// Re-export main components
pub use dataset::{parse_file, parse_text, Example};
pub use error::DataError;
pub use minibatch::{Fetch, Minibatch, MinibatchLoader};
pub use predictions::{load_predictions, restore_row_order, save_predictions};
pub use preprocessor::{Data, DataPreprocessor};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
pub use vocabulary::Vocabulary;
