//! JSON upload parsing.

use crate::model::record::Record;
use crate::upload::selection::SelectedFile;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub type IngestResult<T> = Result<T, IngestError>;

/// Upload failure, displayed verbatim to the user.
#[derive(Debug)]
pub enum IngestError {
    /// Selected file is not declared as `application/json`.
    NotJson { file_name: String },
    /// File parsed, but the top-level value is not an array.
    NotAnArray { file_name: String },
    /// File contents are not valid JSON (including invalid UTF-8).
    InvalidJson {
        file_name: String,
        source: serde_json::Error,
    },
    /// File could not be read from disk.
    Unreadable { path: String, source: io::Error },
}

impl IngestError {
    /// Name of the file that failed.
    pub fn file_name(&self) -> &str {
        match self {
            Self::NotJson { file_name }
            | Self::NotAnArray { file_name }
            | Self::InvalidJson { file_name, .. } => file_name,
            Self::Unreadable { path, .. } => path,
        }
    }

    /// Short machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotJson { .. } => "not_json",
            Self::NotAnArray { .. } => "not_an_array",
            Self::InvalidJson { .. } => "invalid_json",
            Self::Unreadable { .. } => "unreadable",
        }
    }
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotJson { .. } => f.write_str("Please upload a valid JSON file."),
            Self::NotAnArray { .. } => {
                f.write_str("The JSON file must contain an array of objects.")
            }
            Self::InvalidJson { .. } => {
                f.write_str("Invalid JSON file. Please upload a valid JSON.")
            }
            Self::Unreadable { path, source } => {
                write!(f, "Could not read file `{path}`: {source}")
            }
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson { source, .. } => Some(source),
            Self::Unreadable { source, .. } => Some(source),
            Self::NotJson { .. } | Self::NotAnArray { .. } => None,
        }
    }
}

/// Records decoded from one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUpload {
    pub file_name: String,
    /// Object elements in file order.
    pub records: Vec<Record>,
    /// Array elements that were not JSON objects.
    pub skipped_non_object: usize,
}

/// Parses one selected file as a JSON array of records.
///
/// # Errors
/// - `NotJson` when the declared type is not `application/json`.
/// - `InvalidJson` when the bytes are not valid JSON.
/// - `NotAnArray` when the top-level value is not an array.
pub fn parse_selected_file(file: &SelectedFile) -> IngestResult<ParsedUpload> {
    if !file.is_json() {
        return Err(IngestError::NotJson {
            file_name: file.name.clone(),
        });
    }

    let value: Value =
        serde_json::from_slice(&file.contents).map_err(|source| IngestError::InvalidJson {
            file_name: file.name.clone(),
            source,
        })?;
    let Value::Array(items) = value else {
        return Err(IngestError::NotAnArray {
            file_name: file.name.clone(),
        });
    };

    let total = items.len();
    let records = items
        .into_iter()
        .filter_map(Record::from_value)
        .collect::<Vec<_>>();
    let skipped_non_object = total - records.len();

    Ok(ParsedUpload {
        file_name: file.name.clone(),
        records,
        skipped_non_object,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_selected_file, IngestError};
    use crate::upload::selection::SelectedFile;

    #[test]
    fn parse_decodes_array_and_counts_non_objects() {
        let file = SelectedFile::json(
            "clients.json",
            r#"[{"id":1,"name":"Ada","email":"ada@x.io"}, 5, null]"#,
        );
        let parsed = parse_selected_file(&file).expect("array should parse");
        assert_eq!(parsed.file_name, "clients.json");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped_non_object, 2);
    }

    #[test]
    fn parse_rejects_wrong_mime_type_before_reading() {
        let file = SelectedFile::new("clients.csv", Some("text/csv".to_string()), "[]");
        let err = parse_selected_file(&file).expect_err("csv should be rejected");
        assert!(matches!(err, IngestError::NotJson { .. }));
        assert_eq!(err.to_string(), "Please upload a valid JSON file.");
    }

    #[test]
    fn parse_rejects_non_array_and_bad_syntax() {
        let object = SelectedFile::json("object.json", r#"{"a":1}"#);
        let err = parse_selected_file(&object).expect_err("object should be rejected");
        assert!(matches!(err, IngestError::NotAnArray { .. }));

        let broken = SelectedFile::json("broken.json", "{bad");
        let err = parse_selected_file(&broken).expect_err("syntax error should be rejected");
        assert!(matches!(err, IngestError::InvalidJson { .. }));
        assert_eq!(err.code(), "invalid_json");
    }

    #[test]
    fn parse_reports_invalid_utf8_as_invalid_json() {
        let file = SelectedFile::json("latin1.json", vec![b'[', b'"', 0xff, b'"', b']']);
        let err = parse_selected_file(&file).expect_err("invalid utf-8 should be rejected");
        assert!(matches!(err, IngestError::InvalidJson { .. }));
    }
}
