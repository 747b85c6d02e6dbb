use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single numeric feature. Booleans are stored as `Int(0 | 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Int(i) => i as f64,
            FeatureValue::Float(f) => f,
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self { FeatureValue::Int(i64::from(b)) }
}

impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self { FeatureValue::Int(i) }
}

impl From<usize> for FeatureValue {
    fn from(n: usize) -> Self { FeatureValue::Int(i64::try_from(n).unwrap_or(i64::MAX)) }
}

impl From<f64> for FeatureValue {
    fn from(f: f64) -> Self { FeatureValue::Float(f) }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::Float(x) => write!(f, "{}", x),
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            FeatureValue::Int(i) => serializer.serialize_i64(i),
            FeatureValue::Float(f) => serializer.serialize_f64(f),
        }
    }
}

/// Insertion-ordered feature map. Re-inserting a name overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Merge `other` into `self`; on a name collision the incoming value wins.
    pub fn merge(&mut self, other: FeatureVector) {
        for (k, v) in other.entries { self.insert(k, v); }
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.entries.iter().map(|(k, _)| k.as_str()) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> { self.entries.iter().map(|(k, v)| (k.as_str(), *v)) }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries { map.serialize_entry(k, v)?; }
        map.end()
    }
}
