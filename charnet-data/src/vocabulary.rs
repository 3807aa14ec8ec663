use crate::clean::{label_tokens, split_line};
use crate::error::DataError;
use log::info;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Index reserved for the space character.
pub const SPACE_INDEX: usize = 0;

/// Character and label lookup tables.
///
/// Characters are numbered in discovery order starting at 1, with space
/// pinned to [`SPACE_INDEX`]. Labels are numbered in discovery order from 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    chars: HashMap<char, usize>,
    labels: HashMap<String, usize>,
    label_names: Vec<String>,
}

pub(crate) fn read_text(path: &Path) -> Result<String, DataError> {
    let raw = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

impl Vocabulary {
    /// Reads the three dataset files and builds the lookup tables.
    /// Characters come from all three files, labels from train and validation.
    pub fn build(train: &Path, valid: &Path, test: &Path) -> Result<Self, DataError> {
        info!("constructing vocabulary");
        Ok(Self::from_texts(
            &read_text(train)?,
            &read_text(valid)?,
            &read_text(test)?,
        ))
    }

    /// Same as [`build`](Self::build) over in-memory file contents.
    pub fn from_texts(train: &str, valid: &str, test: &str) -> Self {
        let mut chars = HashMap::new();
        chars.insert(' ', SPACE_INDEX);
        let mut labels = HashMap::new();
        let mut label_names = Vec::new();
        let mut per_file: Vec<HashSet<char>> = Vec::with_capacity(3);

        for (text, with_labels) in [(train, true), (valid, true), (test, false)] {
            let mut seen = HashSet::new();
            for line in text.lines() {
                let (entity, label_field) = split_line(line);
                for c in entity.chars() {
                    seen.insert(c);
                    let next = chars.len();
                    chars.entry(c).or_insert(next);
                }
                if with_labels {
                    for token in label_tokens(&label_field) {
                        if !labels.contains_key(token) {
                            labels.insert(token.to_string(), label_names.len());
                            label_names.push(token.to_string());
                        }
                    }
                }
            }
            per_file.push(seen);
        }

        info!("# chars in training {}", per_file[0].len());
        info!("# chars in validation {}", per_file[1].len());
        info!("# chars in testing {}", per_file[2].len());
        let test_only = per_file[2]
            .iter()
            .filter(|&&c| !per_file[0].contains(&c) && !per_file[1].contains(&c))
            .count();
        info!("# chars in (testing-training-validation) {}", test_only);
        info!("# labels {}", label_names.len());

        Vocabulary {
            chars,
            labels,
            label_names,
        }
    }

    pub fn char_index(&self, c: char) -> Option<usize> {
        self.chars.get(&c).copied()
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Size of the character table, space included.
    pub fn num_chars(&self) -> usize {
        self.chars.len()
    }

    pub fn num_labels(&self) -> usize {
        self.label_names.len()
    }

    /// Label strings in index order.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }
}

#[cfg(test)]
#[path = "vocabulary_test.rs"]
mod tests;
