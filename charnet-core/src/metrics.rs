//! Classification metrics over `(rows, labels)` probability and target tensors.

use crate::error::CharNetError;
use crate::tensor::Tensor;

fn check_same_shape(probs: &Tensor, targets: &Tensor, operation: &str) -> Result<(), CharNetError> {
    if probs.shape() != targets.shape() {
        return Err(CharNetError::ShapeMismatch {
            expected: probs.shape().to_vec(),
            actual: targets.shape().to_vec(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// Fraction of rows whose most probable label is the target's first hot label.
///
/// An empty batch has accuracy `0.0`.
pub fn accuracy(probs: &Tensor, targets: &Tensor) -> Result<f64, CharNetError> {
    check_same_shape(probs, targets, "accuracy")?;
    let predicted = probs.argmax_rows()?;
    let expected = targets.argmax_rows()?;
    if predicted.is_empty() {
        return Ok(0.0);
    }
    let hits = predicted
        .iter()
        .zip(&expected)
        .filter(|(p, e)| p == e)
        .count();
    Ok(hits as f64 / predicted.len() as f64)
}

/// Multi-label `(precision, recall, f1)` with predictions `probs > 0.5`.
///
/// The recall denominator is `tp + tn` where `tn` counts missed targets,
/// and it is only computed when `tn + fp > 0`. Every zero guard yields `0.0`.
pub fn evaluate(probs: &Tensor, targets: &Tensor) -> Result<(f64, f64, f64), CharNetError> {
    check_same_shape(probs, targets, "evaluate")?;
    let (mut tp, mut fp, mut tn) = (0.0, 0.0, 0.0);
    for (&p, &t) in probs.data().iter().zip(targets.data()) {
        let pred = if p > 0.5 { 1.0 } else { 0.0 };
        tp += pred * t;
        fp += pred * (1.0 - t);
        tn += (1.0 - pred) * t;
    }
    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tn + fp > 0.0 { tp / (tn + tp) } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    Ok((precision, recall, f1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn t(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
        Tensor::new(data, shape).unwrap()
    }

    #[test]
    fn test_accuracy() {
        let probs = t(vec![0.7, 0.7, 0.2, 0.2, 0.2, 0.8], vec![2, 3]);
        let targets = t(vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0], vec![2, 3]);
        // Row 0: argmax 0 vs 0. Row 1: argmax 2 vs 1.
        assert_relative_eq!(accuracy(&probs, &targets).unwrap(), 0.5);
    }

    #[test]
    fn test_evaluate_reference_case() {
        let probs = t(vec![0.7, 0.7, 0.2, 0.2, 0.2, 0.8], vec![2, 3]);
        let targets = t(vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0], vec![2, 3]);
        let (precision, recall, f1) = evaluate(&probs, &targets).unwrap();
        // tp = 3, fp = 0, tn = 1
        assert_relative_eq!(precision, 1.0);
        assert_relative_eq!(recall, 0.75);
        assert_relative_eq!(f1, 2.0 * 0.75 / 1.75);
    }

    #[test]
    fn test_evaluate_zero_guards() {
        let probs = t(vec![0.1, 0.2], vec![1, 2]);
        let targets = t(vec![0.0, 0.0], vec![1, 2]);
        assert_eq!(evaluate(&probs, &targets).unwrap(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_recall_guard_checks_tn_plus_fp() {
        // Perfect predictions: tn + fp == 0, so recall falls back to 0.
        let probs = t(vec![0.9, 0.1], vec![1, 2]);
        let targets = t(vec![1.0, 0.0], vec![1, 2]);
        let (precision, recall, f1) = evaluate(&probs, &targets).unwrap();
        assert_relative_eq!(precision, 1.0);
        assert_eq!(recall, 0.0);
        assert_eq!(f1, 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let probs = t(vec![0.5, 0.5], vec![1, 2]);
        let targets = t(vec![1.0, 0.0, 0.0], vec![1, 3]);
        assert!(accuracy(&probs, &targets).is_err());
        assert!(evaluate(&probs, &targets).is_err());
    }
}
