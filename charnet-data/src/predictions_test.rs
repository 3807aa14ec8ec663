use super::*;
use std::path::Path;

fn t(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).unwrap()
}

#[test]
fn test_restore_row_order_scatters_rows() {
    // Rows were collected in file order 2, 0, 1.
    let probs = t(vec![0.2, 0.8, 0.9, 0.1, 0.4, 0.6], vec![3, 2]);
    let ordered = restore_row_order(&probs, &[2, 0, 1]).unwrap();
    assert_eq!(ordered.data(), &[0.9, 0.1, 0.4, 0.6, 0.2, 0.8]);
}

#[test]
fn test_restore_row_order_errors() {
    let probs = t(vec![0.5; 4], vec![2, 2]);
    assert!(matches!(
        restore_row_order(&probs, &[0, 2]),
        Err(DataError::IndexOutOfRange { index: 2, len: 2, .. })
    ));
    assert!(matches!(
        restore_row_order(&probs, &[0]),
        Err(DataError::Core(CharNetError::ShapeMismatch { .. }))
    ));
    let flat = t(vec![0.5; 4], vec![4]);
    assert!(restore_row_order(&flat, &[0, 1, 2, 3]).is_err());
}

#[test]
fn test_npy_path() {
    assert_eq!(npy_path(Path::new("output")), Path::new("output.npy"));
    assert_eq!(npy_path(Path::new("dir/run.npy")), Path::new("dir/run.npy"));
    assert_eq!(npy_path(Path::new("run.v2")), Path::new("run.v2.npy"));
}

#[test]
fn test_save_and_load_round_trip() {
    let path = std::env::temp_dir().join(format!("charnet_predictions_{}", std::process::id()));
    let probs = t(vec![0.3, 0.7, 0.6, 0.4, 0.1, 0.9, 0.5, 0.5], vec![4, 2]);
    let indices = [3, 1, 0, 2];
    let written = save_predictions(&path, &probs, &indices).unwrap();
    assert_eq!(written.extension().and_then(|e| e.to_str()), Some("npy"));

    let loaded = load_predictions(&written).unwrap();
    assert_eq!(loaded.shape(), &[4, 2]);
    for (k, &row) in indices.iter().enumerate() {
        assert_eq!(&loaded.data()[row * 2..row * 2 + 2], &probs.data()[k * 2..k * 2 + 2]);
    }
    std::fs::remove_file(written).unwrap();
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("charnet_predictions_missing.npy");
    assert!(matches!(load_predictions(&path), Err(DataError::Io { .. })));
}
