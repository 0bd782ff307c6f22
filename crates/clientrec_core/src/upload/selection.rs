//! Selected-file payloads.

use std::io;
use std::path::Path;

/// MIME type a JSON picker filters on.
pub const JSON_MIME_TYPE: &str = "application/json";

/// One file as delivered by a picker: name, declared type, raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name, without directory components.
    pub name: String,
    /// Declared MIME type; `None` when the platform could not tell.
    pub mime_type: Option<String>,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

impl SelectedFile {
    /// Creates a selected file from already-read contents.
    pub fn new(
        name: impl Into<String>,
        mime_type: Option<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type,
            contents: contents.into(),
        }
    }

    /// Shorthand for a file declared as `application/json`.
    pub fn json(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Some(JSON_MIME_TYPE.to_string()), contents)
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    /// - Returns the underlying I/O error when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type_for_path(path), contents))
    }

    /// Returns whether the declared type is `application/json`.
    pub fn is_json(&self) -> bool {
        self.mime_type.as_deref() == Some(JSON_MIME_TYPE)
    }
}

/// Ordered multi-file selection event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    pub fn single(file: SelectedFile) -> Self {
        Self { files: vec![file] }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn mime_type_for_path(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if extension.eq_ignore_ascii_case("json") {
        Some(JSON_MIME_TYPE.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{mime_type_for_path, SelectedFile, JSON_MIME_TYPE};
    use std::path::Path;

    #[test]
    fn json_extension_maps_to_json_mime_type() {
        assert_eq!(
            mime_type_for_path(Path::new("/tmp/clients.JSON")).as_deref(),
            Some(JSON_MIME_TYPE)
        );
        assert_eq!(mime_type_for_path(Path::new("/tmp/clients.csv")), None);
        assert_eq!(mime_type_for_path(Path::new("/tmp/clients")), None);
    }

    #[test]
    fn is_json_checks_declared_type_only() {
        assert!(SelectedFile::json("a.txt", "[]").is_json());
        assert!(!SelectedFile::new("a.json", None, "[]").is_json());
    }
}
