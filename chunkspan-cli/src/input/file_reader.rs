//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Length of the text in chars, the unit all offsets are counted in
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_read_text_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        let content = "Students have been bussed to the Bozeman Public Library.";
        fs::write(&file_path, content).unwrap();

        let result = FileReader::read_text(&file_path).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_read_text_nonexistent_file() {
        let path = Path::new("/nonexistent/file.txt");
        let err = FileReader::read_text(path).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("latin1.txt");
        fs::write(&file_path, [0x5a, 0xfc, 0x72, 0x69, 0x63, 0x68]).unwrap();

        let err = FileReader::read_text(&file_path).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_utf8_char_len() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("utf8.txt");
        fs::write(&file_path, "Zürich 🌍").unwrap();

        let text = FileReader::read_text(&file_path).unwrap();
        assert_eq!(FileReader::char_len(&text), 8);
        assert_eq!(text.len(), 12);
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");

        File::create(&file_path).unwrap();

        let content = FileReader::read_text(&file_path).unwrap();
        assert_eq!(content, "");
    }
}
