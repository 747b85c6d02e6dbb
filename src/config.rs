use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "LURE_CONFIG";

/// One labelled directory of crawl records.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub label: u8,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output: PathBuf,
    pub recursive: bool,
    pub extension: String,
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output/phishing_dataset.csv"),
            recursive: false,
            extension: "json".to_string(),
            categories: vec![
                Category { name: "benign".to_string(), label: 1, path: PathBuf::from("data/benign") },
                Category { name: "malicious".to_string(), label: 0, path: PathBuf::from("data/malicious") },
            ],
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Explicit path, then `LURE_CONFIG`, then the per-user config file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit { return Self::from_file(p); }
        if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Self::from_file(Path::new(&p));
        }
        match user_config_path() {
            Some(p) if p.is_file() => Self::from_file(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    /// Point the named category at `path`, adding it with `label` if it is not configured.
    pub fn set_category_path(&mut self, name: &str, label: u8, path: PathBuf) {
        match self.category_mut(name) {
            Some(c) => c.path = path,
            None => self.categories.push(Category { name: name.to_string(), label, path }),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "lure", "lure").map(|p| p.config_dir().join("lure.toml"))
}
