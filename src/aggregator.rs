use tracing::warn;

use crate::dataset::DatasetRow;
use crate::extract::{default_extractors, section_input, ExtractError, Extractor};
use crate::features::FeatureVector;
use crate::fields::Object;

/// Result of one extractor on one record.
#[derive(Debug)]
pub struct SectionOutcome {
    pub extractor: &'static str,
    pub result: Result<FeatureVector, ExtractError>,
}

/// Aggregator owns the extractor set and turns one record into one dataset row.
pub struct Aggregator {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for Aggregator {
    fn default() -> Self { Self::new() }
}

impl Aggregator {
    pub fn new() -> Self { Self::with_extractors(default_extractors()) }
    pub fn with_extractors(extractors: Vec<Box<dyn Extractor>>) -> Self { Self { extractors } }
    pub fn extractors(&self) -> &[Box<dyn Extractor>] { &self.extractors }

    /// Run every extractor against its section of `record`, in merge order.
    pub fn run(&self, record: &Object) -> Vec<SectionOutcome> {
        let empty = Object::new();
        self.extractors
            .iter()
            .map(|e| SectionOutcome {
                extractor: e.name(),
                result: section_input(record, e.section(), &empty).and_then(|input| e.extract(input)),
            })
            .collect()
    }

    /// Merge all extractor outputs for `record`. A failing extractor contributes nothing
    /// and is logged against `record_id`; the remaining sections are still merged.
    pub fn features(&self, record: &Object, record_id: &str) -> (FeatureVector, usize) {
        let mut merged = FeatureVector::new();
        let mut failures = 0;
        for outcome in self.run(record) {
            match outcome.result {
                Ok(fv) => merged.merge(fv),
                Err(e) => {
                    failures += 1;
                    warn!(extractor = outcome.extractor, record = record_id, "Extractor error in '{}' while processing '{}': {}", outcome.extractor, record_id, e);
                }
            }
        }
        (merged, failures)
    }

    pub fn build_row(&self, record: &Object, label: u8, filename: &str, category: &str) -> (DatasetRow, usize) {
        let (features, failures) = self.features(record, filename);
        let row = DatasetRow { features, label, filename: filename.to_string(), category: category.to_string() };
        (row, failures)
    }
}
