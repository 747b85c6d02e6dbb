use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::features::FeatureVector;

pub const METADATA_COLUMNS: [&str; 3] = ["label", "filename", "category"];

/// One record's merged features plus its labelling metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub features: FeatureVector,
    pub label: u8,
    pub filename: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new() -> Self { Self::default() }
    pub fn push(&mut self, row: DatasetRow) { self.rows.push(row); }
    pub fn rows(&self) -> &[DatasetRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Feature columns in first-seen order across rows, then the metadata columns.
    pub fn columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut cols = Vec::new();
        for name in self.rows.iter().flat_map(|r| r.features.keys()) {
            if seen.insert(name) { cols.push(name.to_string()); }
        }
        cols.extend(METADATA_COLUMNS.iter().map(|c| c.to_string()));
        cols
    }

    /// Rows as string cells over [`Dataset::columns`], missing features filled with `0`.
    pub fn rectangular(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let columns = self.columns();
        let feature_cols = &columns[..columns.len() - METADATA_COLUMNS.len()];
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut cells: Vec<String> = feature_cols
                    .iter()
                    .map(|c| r.features.get(c).map(|v| v.to_string()).unwrap_or_else(|| "0".to_string()))
                    .collect();
                cells.push(r.label.to_string());
                cells.push(r.filename.clone());
                cells.push(r.category.clone());
                cells
            })
            .collect();
        (columns, rows)
    }

    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let (columns, rows) = self.rectangular();
        let mut w = csv::Writer::from_writer(writer);
        w.write_record(&columns)?;
        for row in rows { w.write_record(&row)?; }
        w.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        self.write_csv_to(io::BufWriter::new(file)).with_context(|| format!("writing {}", path.display()))
    }
}
