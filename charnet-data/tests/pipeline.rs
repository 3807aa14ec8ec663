mod common;

use charnet_core::Tensor;
use charnet_data::{
    load_predictions, save_predictions, DataPreprocessor, Fetch, MinibatchLoader, RandomSampler,
};
use common::write_dataset;

const TRAIN: &str = "Paris\tcity\nLe%20Monde\tpaper\nSeine\triver,water\nLyon\tcity\n";
const VALID: &str = "Rh%C3%B4ne\triver\nNice\tcity\n";
const TEST: &str = "Lille\tcity\nLoire\triver\nLe Figaro\tpaper\nMarseille\tcity\nArles\n";

#[test]
fn preprocess_then_batch() {
    let [train, valid, test] = write_dataset("batching", TRAIN, VALID, TEST);
    let data = DataPreprocessor::new().preprocess(&train, &valid, &test).unwrap();
    assert_eq!(data.training.len(), 4);
    assert_eq!(data.validation.len(), 2);
    assert_eq!(data.test.len(), 5);
    assert_eq!(data.vocab.label_names(), &["city", "paper", "river", "water"]);
    // Decoded, not raw: 'ô' is a character of the vocabulary.
    assert!(data.vocab.char_index('ô').is_some());
    assert!(data.vocab.char_index('%').is_none());

    let (num_chars, num_labels) = (data.vocab.num_chars(), data.vocab.num_labels());
    let mut loader =
        MinibatchLoader::new(data.training, 3, 6, num_chars, num_labels, RandomSampler::new(1))
            .unwrap();
    let batches: Vec<_> = loader.epoch().map(|b| b.unwrap()).collect();
    assert_eq!(batches.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![3, 1]);
    for batch in &batches {
        assert_eq!(batch.flat_features().unwrap().shape(), &[batch.len(), 6 * num_chars]);
        assert_eq!(batch.labels.shape(), &[batch.len(), num_labels]);
    }
    // "Seine" carries two labels.
    let seine = batches
        .iter()
        .find_map(|b| {
            b.indices
                .iter()
                .position(|&i| i == 2)
                .map(|k| b.labels.data()[k * num_labels..(k + 1) * num_labels].to_vec())
        })
        .unwrap();
    assert_eq!(seine, vec![0.0, 0.0, 1.0, 1.0]);
    assert!(matches!(loader.next_batch().unwrap(), Fetch::Batch(_)));
}

#[test]
fn saved_predictions_follow_file_order() {
    let [train, valid, test] = write_dataset("roundtrip", TRAIN, VALID, TEST);
    let data = DataPreprocessor::new().preprocess(&train, &valid, &test).unwrap();
    let (num_chars, num_labels) = (data.vocab.num_chars(), data.vocab.num_labels());
    let mut loader =
        MinibatchLoader::new(data.test, 2, 10, num_chars, num_labels, RandomSampler::new(5))
            .unwrap();

    // Each "prediction" row encodes the original row index it belongs to.
    let mut rows = Vec::new();
    let mut indices = Vec::new();
    for batch in loader.epoch() {
        let batch = batch.unwrap();
        for &i in &batch.indices {
            rows.push(Tensor::new(vec![i as f64, -(i as f64)], vec![1, 2]).unwrap());
        }
        indices.extend(batch.indices);
    }
    let probs = Tensor::vstack(&rows).unwrap();

    let out = std::env::temp_dir().join(format!("charnet_pipeline_{}.npy", std::process::id()));
    let written = save_predictions(&out, &probs, &indices).unwrap();
    let loaded = load_predictions(&written).unwrap();
    assert_eq!(loaded.shape(), &[5, 2]);
    for row in 0..5 {
        assert_eq!(loaded.data()[row * 2], row as f64);
        assert_eq!(loaded.data()[row * 2 + 1], -(row as f64));
    }
    std::fs::remove_file(written).unwrap();
}
