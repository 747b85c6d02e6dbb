pub mod aggregator;
pub mod config;
pub mod dataset;
pub mod extract;
pub mod features;
pub mod fields;
pub mod record;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::aggregator::Aggregator;
    pub use crate::config::{Category, Config};
    pub use crate::dataset::{Dataset, DatasetRow};
    pub use crate::extract::{Extractor, ExtractError, Section};
    pub use crate::features::{FeatureValue, FeatureVector};
    pub use crate::record::{load_record, RecordError};
    pub use crate::{BatchReport, Lure};
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::aggregator::Aggregator;
use crate::config::{Category, Config};
use crate::dataset::Dataset;
use crate::features::FeatureVector;
use crate::record::load_record;

/// Counters for one dataset build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub files_seen: usize,
    pub rows: usize,
    pub extractor_failures: usize,
    pub missing_categories: Vec<String>,
    /// Skipped files keyed by [`record::RecordError::kind`].
    pub skipped: BTreeMap<&'static str, usize>,
}

impl BatchReport {
    pub fn skipped_total(&self) -> usize { self.skipped.values().sum() }
}

/// Batch entry point: walks the configured category directories and builds the dataset.
pub struct Lure {
    config: Config,
    aggregator: Aggregator,
}

impl Lure {
    pub fn new(config: Config) -> Self { Self { config, aggregator: Aggregator::new() } }
    pub fn with_aggregator(config: Config, aggregator: Aggregator) -> Self { Self { config, aggregator } }
    pub fn config(&self) -> &Config { &self.config }
    pub fn aggregator(&self) -> &Aggregator { &self.aggregator }

    /// Process every category in order. Bad files and failing extractors are logged and
    /// counted; they never abort the batch.
    pub fn build_dataset(&self) -> (Dataset, BatchReport) {
        let mut dataset = Dataset::new();
        let mut report = BatchReport::default();
        for category in &self.config.categories {
            if !category.path.is_dir() {
                warn!(category = %category.name, "Folder not found: {}", category.path.display());
                report.missing_categories.push(category.name.clone());
                continue;
            }
            info!("Processing folder: {} (label={})", category.name.to_uppercase(), category.label);
            let files = self.list_files(&category.path);
            let before = dataset.len();
            for path in &files {
                report.files_seen += 1;
                self.process_file(category, path, &mut dataset, &mut report);
            }
            info!(category = %category.name, files = files.len(), rows = dataset.len() - before, "category done");
        }
        report.rows = dataset.len();
        info!("Dataset built with {} samples and {} columns.", dataset.len(), dataset.columns().len());
        (dataset, report)
    }

    fn process_file(&self, category: &Category, path: &Path, dataset: &mut Dataset, report: &mut BatchReport) {
        let filename = display_name(&category.path, path);
        let record = match load_record(path) {
            Ok(r) => r,
            Err(e) => {
                warn!(file = %filename, reason = e.kind(), "Skipped '{}': {}", filename, e);
                *report.skipped.entry(e.kind()).or_default() += 1;
                return;
            }
        };
        let (row, failures) = self.aggregator.build_row(&record, category.label, &filename, &category.name);
        report.extractor_failures += failures;
        debug!(file = %filename, features = row.features.len(), "row built");
        dataset.push(row);
    }

    /// Record files under `dir` with the configured extension, sorted for a stable run.
    pub fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        let ext = self.config.extension.trim_start_matches('.').to_ascii_lowercase();
        let matches = |p: &Path| p.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase() == ext).unwrap_or(false);
        let mut files: Vec<PathBuf> = if self.config.recursive {
            WalkDir::new(dir)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| matches(p.as_path()))
                .collect()
        } else {
            match fs::read_dir(dir) {
                Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| p.is_file() && matches(p.as_path())).collect(),
                Err(e) => {
                    warn!("Error listing {}: {}", dir.display(), e);
                    Vec::new()
                }
            }
        };
        files.sort();
        files
    }

    /// Build the dataset and write it to the configured output path.
    pub fn run(&self) -> Result<BatchReport> {
        let (dataset, report) = self.build_dataset();
        dataset.write_csv(&self.config.output)?;
        info!("CSV saved to: {}", self.config.output.display());
        Ok(report)
    }

    /// Features for a single record file; `section` restricts output to one extractor.
    pub fn inspect(&self, path: &Path, section: Option<&str>) -> Result<FeatureVector> {
        let record = load_record(path).map_err(|e| anyhow!("{}: {}", path.display(), e))?;
        let id = path.display().to_string();
        match section {
            None => Ok(self.aggregator.features(&record, &id).0),
            Some(name) => {
                let outcome = self
                    .aggregator
                    .run(&record)
                    .into_iter()
                    .find(|o| o.extractor == name)
                    .ok_or_else(|| anyhow!("unknown section `{}`", name))?;
                outcome.result.map_err(|e| anyhow!("extractor `{}` failed on {}: {}", name, id, e))
            }
        }
    }
}

fn display_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
