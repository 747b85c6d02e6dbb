use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Phishing feature extraction from crawled page records
#[derive(Parser)]
#[command(name = "lure")]
#[command(about = "Build labelled feature datasets from crawl records", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $LURE_CONFIG, then the per-user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract features from every record and write the CSV dataset
    Build {
        /// Directory of benign records (label 1)
        #[arg(long)]
        benign: Option<PathBuf>,
        /// Directory of malicious records (label 0)
        #[arg(long)]
        malicious: Option<PathBuf>,
        /// Output CSV path
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Descend into sub-directories
        #[arg(long)]
        recursive: bool,
    },
    /// Print the features of a single record as JSON
    Inspect {
        /// Record file
        file: PathBuf,
        /// Only one extractor's output (url, host, content, additional)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// List each extractor's feature names
    Features,
}
