//! Persisting model outputs in original file row order, as `.npy` arrays.

use crate::error::DataError;
use charnet_core::{CharNetError, Tensor};
use log::info;
use npyz::WriterBuilder;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Reorders batch-collected rows back into file order: row `k` of `probs`
/// becomes row `indices[k]` of the result.
///
/// # Errors
/// `ShapeMismatch` if `probs` is not `(indices.len(), cols)`,
/// `IndexOutOfRange` if an index does not name a row.
pub fn restore_row_order(probs: &Tensor, indices: &[usize]) -> Result<Tensor, DataError> {
    let (rows, cols) = match probs.shape() {
        &[rows, cols] => (rows, cols),
        other => {
            return Err(CharNetError::ShapeMismatch {
                expected: vec![indices.len(), 0],
                actual: other.to_vec(),
                operation: "restore_row_order (rank)".to_string(),
            }
            .into())
        }
    };
    if rows != indices.len() {
        return Err(CharNetError::ShapeMismatch {
            expected: vec![indices.len(), cols],
            actual: probs.shape().to_vec(),
            operation: "restore_row_order (row count)".to_string(),
        }
        .into());
    }
    let mut out = vec![0.0; rows * cols];
    let data = probs.data();
    for (k, &target) in indices.iter().enumerate() {
        if target >= rows {
            return Err(DataError::IndexOutOfRange {
                what: "prediction rows",
                index: target,
                len: rows,
            });
        }
        out[target * cols..(target + 1) * cols].copy_from_slice(&data[k * cols..(k + 1) * cols]);
    }
    Ok(Tensor::new(out, vec![rows, cols])?)
}

/// `path` with a `.npy` extension appended when it has none.
pub fn npy_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == "npy" => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".npy");
            PathBuf::from(name)
        }
    }
}

/// Writes `probs` in file row order as an f64 `.npy` array.
///
/// Returns the path actually written (see [`npy_path`]).
pub fn save_predictions(
    path: &Path,
    probs: &Tensor,
    indices: &[usize],
) -> Result<PathBuf, DataError> {
    let ordered = restore_row_order(probs, indices)?;
    let path = npy_path(path);
    let file = File::create(&path).map_err(|e| DataError::io(&path, e))?;
    let shape: Vec<u64> = ordered.shape().iter().map(|&d| d as u64).collect();
    let mut writer = npyz::WriteOptions::<f64>::new()
        .default_dtype()
        .shape(&shape)
        .writer(BufWriter::new(file))
        .begin_nd()
        .map_err(|e| DataError::io(&path, e))?;
    writer
        .extend(ordered.data().iter().copied())
        .map_err(|e| DataError::io(&path, e))?;
    writer.finish().map_err(|e| DataError::io(&path, e))?;
    info!("saved {:?} predictions to {:?}", ordered.shape(), path);
    Ok(path)
}

/// Reads an f64 `.npy` array written by [`save_predictions`].
pub fn load_predictions(path: &Path) -> Result<Tensor, DataError> {
    let raw = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    let npy = npyz::NpyFile::new(&raw[..]).map_err(|e| DataError::io(path, e))?;
    let shape: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();
    let data = npy.into_vec::<f64>().map_err(|e| DataError::Npy {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Tensor::new(data, shape)?)
}

#[cfg(test)]
#[path = "predictions_test.rs"]
mod tests;
