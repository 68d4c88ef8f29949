use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::error::Result;

/// Pretty-prints `records` into `dir/file_name`, creating `dir` when missing.
pub fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    records: &T,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("bot");
        let path = write_json(&nested, "fees.json", &vec![serde_json::json!({ "a": 1 })]).unwrap();

        assert_eq!(path, nested.join("fees.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([{ "a": 1 }]));
    }
}
