use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::extract::json_kind;
use crate::fields::Object;

/// Reasons a record file is excluded from the dataset.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("error reading file: {0}")]
    Read(#[from] io::Error),
    #[error("file is not valid UTF-8")]
    Encoding,
    #[error("empty file")]
    Empty,
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid JSON structure: top-level value is a {0}, expected an object")]
    NotAnObject(&'static str),
    #[error("record has no fields")]
    EmptyRecord,
}

impl RecordError {
    /// Short stable label used when tallying skipped files.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Read(_) => "read_error",
            RecordError::Encoding => "encoding",
            RecordError::Empty => "empty_file",
            RecordError::InvalidJson(_) => "invalid_json",
            RecordError::NotAnObject(_) => "not_an_object",
            RecordError::EmptyRecord => "empty_record",
        }
    }
}

pub fn load_record(path: &Path) -> Result<Object, RecordError> {
    let bytes = fs::read(path)?;
    parse_record(&bytes)
}

pub fn parse_record(bytes: &[u8]) -> Result<Object, RecordError> {
    let text = std::str::from_utf8(bytes).map_err(|_| RecordError::Encoding)?;
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() { return Err(RecordError::Empty); }
    match serde_json::from_str::<Value>(text)? {
        Value::Object(o) if o.is_empty() => Err(RecordError::EmptyRecord),
        Value::Object(o) => Ok(o),
        other => Err(RecordError::NotAnObject(json_kind(&other))),
    }
}
