use super::*;

const TRAIN: &str = "ab\tx,y\nba c\ty\n";
const VALID: &str = "cd\tz\n";
const TEST: &str = "e%20f\tw\n";

#[test]
fn test_space_is_reserved_and_counted() {
    let vocab = Vocabulary::from_texts(TRAIN, VALID, TEST);
    assert_eq!(vocab.char_index(' '), Some(SPACE_INDEX));
    // space, a, b, c, d, e, f
    assert_eq!(vocab.num_chars(), 7);
    assert_eq!(vocab.char_index('a'), Some(1));
    assert_eq!(vocab.char_index('b'), Some(2));
    assert_eq!(vocab.char_index('c'), Some(3));
    assert_eq!(vocab.char_index('f'), Some(6));
}

#[test]
fn test_indices_are_dense() {
    let vocab = Vocabulary::from_texts(TRAIN, VALID, TEST);
    let mut indices: Vec<usize> = "abcdef "
        .chars()
        .map(|c| vocab.char_index(c).unwrap())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
}

#[test]
fn test_labels_from_train_and_validation_only() {
    let vocab = Vocabulary::from_texts(TRAIN, VALID, TEST);
    assert_eq!(vocab.label_names(), &["x", "y", "z"]);
    assert_eq!(vocab.label_index("z"), Some(2));
    assert_eq!(vocab.label_index("w"), None);
}

#[test]
fn test_validation_file_contributes_characters() {
    let vocab = Vocabulary::from_texts("a\tl\n", "q\tl\n", "");
    assert!(vocab.char_index('q').is_some());
}

#[test]
fn test_build_reports_missing_file() {
    let missing = std::env::temp_dir().join("charnet_vocab_missing.train.clean");
    let result = Vocabulary::build(&missing, &missing, &missing);
    assert!(matches!(result, Err(DataError::Io { .. })));
}
