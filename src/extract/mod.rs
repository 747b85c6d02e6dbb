//! Feature extractors. Each one maps one section of a crawl record to a
//! fixed-vocabulary [`FeatureVector`].

use serde_json::Value;
use thiserror::Error;

use crate::features::FeatureVector;
use crate::fields::{is_falsy, Object};

pub mod additional;
pub mod content;
pub mod host;
pub mod url;

pub use additional::AdditionalExtractor;
pub use content::ContentExtractor;
pub use host::HostExtractor;
pub use self::url::UrlExtractor;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("section '{section}' is a {found}, expected an object")]
    SectionType { section: &'static str, found: &'static str },
    #[error("{0}")]
    Extractor(String),
}

/// Which part of a record an extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The full top-level record.
    Root,
    /// A nested object under this key.
    Key(&'static str),
}

pub trait Extractor {
    fn name(&self) -> &'static str;
    fn section(&self) -> Section;
    /// Every feature name this extractor emits, in emission order.
    fn feature_names(&self) -> &'static [&'static str];
    fn extract(&self, input: &Object) -> Result<FeatureVector, ExtractError>;
}

/// The four extractors in merge order.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(UrlExtractor),
        Box::new(HostExtractor),
        Box::new(ContentExtractor),
        Box::new(AdditionalExtractor),
    ]
}

/// Resolve the input object for `section`. Absent or empty-ish values read as `{}`.
pub fn section_input<'a>(record: &'a Object, section: Section, empty: &'a Object) -> Result<&'a Object, ExtractError> {
    let key = match section {
        Section::Root => return Ok(record),
        Section::Key(k) => k,
    };
    match record.get(key) {
        None => Ok(empty),
        Some(Value::Object(o)) => Ok(o),
        Some(v) if is_falsy(v) => Ok(empty),
        Some(v) => Err(ExtractError::SectionType { section: key, found: json_kind(v) }),
    }
}

pub(crate) fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
