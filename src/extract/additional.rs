//! Shape summary of the free-form `additional` section.

use serde_json::Value;

use super::{ExtractError, Extractor, Section};
use crate::features::FeatureVector;
use crate::fields::{char_len, Object};

const FEATURES: &[&str] = &[
    "additional_present",
    "additional_num_keys",
    "additional_num_nulls",
    "additional_num_true_flags",
    "additional_num_arrays",
    "additional_total_array_len",
    "additional_num_objects",
    "additional_max_depth",
    "additional_string_chars",
];

pub struct AdditionalExtractor;

impl Extractor for AdditionalExtractor {
    fn name(&self) -> &'static str { "additional" }
    fn section(&self) -> Section { Section::Key("additional") }
    fn feature_names(&self) -> &'static [&'static str] { FEATURES }

    fn extract(&self, additional: &Object) -> Result<FeatureVector, ExtractError> {
        let mut shape = Shape::default();
        for v in additional.values() { shape.visit(v, 2); }

        let mut f = FeatureVector::new();
        f.insert("additional_present", !additional.is_empty());
        f.insert("additional_num_keys", additional.len());
        f.insert("additional_num_nulls", shape.nulls);
        f.insert("additional_num_true_flags", shape.trues);
        f.insert("additional_num_arrays", shape.arrays);
        f.insert("additional_total_array_len", shape.array_len);
        f.insert("additional_num_objects", shape.objects);
        f.insert("additional_max_depth", if additional.is_empty() { 0 } else { shape.max_depth.max(1) });
        f.insert("additional_string_chars", shape.string_chars);
        Ok(f)
    }
}

#[derive(Debug, Default)]
struct Shape {
    nulls: usize,
    trues: usize,
    arrays: usize,
    array_len: usize,
    objects: usize,
    max_depth: usize,
    string_chars: usize,
}

impl Shape {
    /// `depth` is the nesting level `value` would add if it is a container.
    fn visit(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.nulls += 1,
            Value::Bool(b) => self.trues += usize::from(*b),
            Value::Number(_) => {}
            Value::String(s) => self.string_chars += char_len(s),
            Value::Array(items) => {
                self.arrays += 1;
                self.array_len += items.len();
                self.max_depth = self.max_depth.max(depth);
                for v in items { self.visit(v, depth + 1); }
            }
            Value::Object(map) => {
                self.objects += 1;
                self.max_depth = self.max_depth.max(depth);
                for v in map.values() { self.visit(v, depth + 1); }
            }
        }
    }
}
