use charnet_core::CharNetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading datasets, assembling minibatches or
/// persisting predictions.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed .npy file {path:?}: {reason}")]
    Npy { path: PathBuf, reason: String },

    #[error("Batch size must be at least 1, got {batch_size}")]
    InvalidBatchSize { batch_size: usize },

    #[error("Index {index} out of range for {what} of length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Core(#[from] CharNetError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
