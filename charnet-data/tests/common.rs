use std::fs;
use std::path::PathBuf;

/// Writes `train`, `valid` and `test` contents as `{name}.{split}.clean` in a
/// fresh temp directory and returns the three paths.
#[allow(dead_code)]
pub fn write_dataset(name: &str, train: &str, valid: &str, test: &str) -> [PathBuf; 3] {
    let dir = std::env::temp_dir().join(format!("charnet_data_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create temp dataset dir");
    let mut paths = Vec::new();
    for (split, content) in [("train", train), ("valid", valid), ("test", test)] {
        let path = dir.join(format!("{}.{}.clean", name, split));
        fs::write(&path, content).expect("Failed to write dataset file");
        paths.push(path);
    }
    [paths[0].clone(), paths[1].clone(), paths[2].clone()]
}
