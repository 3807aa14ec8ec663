use crate::dataset::{parse_file, Example};
use crate::error::DataError;
use crate::vocabulary::Vocabulary;
use log::info;
use std::path::Path;

/// The three parsed splits with the vocabulary they were encoded against.
#[derive(Debug, Clone)]
pub struct Data {
    pub training: Vec<Example>,
    pub validation: Vec<Example>,
    pub test: Vec<Example>,
    pub vocab: Vocabulary,
}

/// Turns the train/validation/test files into one [`Data`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DataPreprocessor;

impl DataPreprocessor {
    pub fn new() -> Self {
        DataPreprocessor
    }

    pub fn preprocess(
        &self,
        train_file: &Path,
        validation_file: &Path,
        test_file: &Path,
    ) -> Result<Data, DataError> {
        let vocab = Vocabulary::build(train_file, validation_file, test_file)?;
        info!("preparing training data");
        let training = parse_file(train_file, &vocab)?;
        info!("preparing validation data");
        let validation = parse_file(validation_file, &vocab)?;
        info!("preparing test data");
        let test = parse_file(test_file, &vocab)?;
        Ok(Data {
            training,
            validation,
            test,
            vocab,
        })
    }
}
