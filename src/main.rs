mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use lure::config::Config;
use lure::Lure;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_target(false)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { benign, malicious, out, recursive } => {
            if let Some(p) = benign { config.set_category_path("benign", 1, p); }
            if let Some(p) = malicious { config.set_category_path("malicious", 0, p); }
            if let Some(p) = out { config.output = p; }
            config.recursive |= recursive;

            let report = Lure::new(config).run()?;
            info!(
                files = report.files_seen,
                rows = report.rows,
                skipped = report.skipped_total(),
                extractor_failures = report.extractor_failures,
                "batch complete"
            );
            for (reason, count) in &report.skipped {
                info!("skipped {} file(s): {}", count, reason);
            }
        }
        Commands::Inspect { file, section } => {
            let features = Lure::new(config).inspect(&file, section.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&features)?);
        }
        Commands::Features => {
            let lure = Lure::new(config);
            for e in lure.aggregator().extractors() {
                println!("[{}]", e.name());
                for name in e.feature_names() { println!("  {}", name); }
            }
        }
    }
    Ok(())
}
