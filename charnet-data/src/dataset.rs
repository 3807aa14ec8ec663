use crate::clean::{label_tokens, split_line};
use crate::error::DataError;
use crate::vocabulary::{read_text, Vocabulary, SPACE_INDEX};
use log::{info, warn};
use std::path::Path;

/// One parsed row of a dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// 0-based row in the source file, kept through shuffling.
    pub index: usize,
    /// Character indices of the entity.
    pub chars: Vec<usize>,
    /// Label indices; unknown labels map to 0.
    pub labels: Vec<usize>,
}

/// Parses every line of `text` into an [`Example`].
pub fn parse_text(text: &str, vocab: &Vocabulary) -> Vec<Example> {
    let examples: Vec<Example> = text
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let (entity, label_field) = split_line(line);
            let chars = entity
                .chars()
                .map(|c| {
                    vocab.char_index(c).unwrap_or_else(|| {
                        warn!("row {}: character {:?} not in vocabulary, using index {}", index, c, SPACE_INDEX);
                        SPACE_INDEX
                    })
                })
                .collect();
            let labels = label_tokens(&label_field)
                .map(|l| vocab.label_index(l).unwrap_or(0))
                .collect();
            Example {
                index,
                chars,
                labels,
            }
        })
        .collect();
    info!("num_rows: {}", examples.len());
    examples
}

/// Reads and parses a dataset file.
pub fn parse_file(path: &Path, vocab: &Vocabulary) -> Result<Vec<Example>, DataError> {
    let text = read_text(path)?;
    Ok(parse_text(&text, vocab))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_texts("ab\tx,y\n", "c\tz\n", "")
    }

    #[test]
    fn test_rows_keep_file_order_index() {
        let examples = parse_text("ab\tx\nba\ty,z\nc a\tx\n", &vocab());
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].index, 0);
        assert_eq!(examples[2].index, 2);
        assert_eq!(examples[0].chars, vec![1, 2]);
        assert_eq!(examples[1].labels, vec![1, 2]);
        assert_eq!(examples[2].chars, vec![3, SPACE_INDEX, 1]);
    }

    #[test]
    fn test_unknown_label_and_char_map_to_zero() {
        let examples = parse_text("aq\tunknown,y\n", &vocab());
        assert_eq!(examples[0].chars, vec![1, SPACE_INDEX]);
        assert_eq!(examples[0].labels, vec![0, 1]);
    }

    #[test]
    fn test_missing_label_field() {
        let examples = parse_text("ab\n", &vocab());
        assert_eq!(examples[0].labels, vec![0]);
    }
}
