//! Auctioneer CLI - standalone HTML auction listings from YAML.

use std::path::PathBuf;

use anyhow::{Context, Result};
use auctioneer_static::{BuildConfig, ListingBuilder};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod report;

#[derive(Parser)]
#[command(name = "auctioneer")]
#[command(about = "Generate eBay auction HTML files")]
#[command(version)]
pub struct Cli {
    /// Path to the auctions YAML file
    auctions_file: PathBuf,

    /// Directory for output HTML files (defaults to config or ".")
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to auctioneer.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON report of every record to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// HTML-escape titles and descriptions
    #[arg(long)]
    escape: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let file_config = config::load_config(cli.config.as_deref())?;

    let config = BuildConfig {
        input: cli.auctions_file,
        output_dir: cli
            .output_dir
            .or(file_config.output.dir)
            .unwrap_or_else(|| PathBuf::from(".")),
        images: file_config.images,
        escape: cli.escape || file_config.output.escape,
    };

    let report = ListingBuilder::new(config)
        .build()
        .context("Build aborted")?;

    tracing::info!(
        "Wrote {} listings ({} skipped or failed) in {}ms",
        report.written(),
        report.problems(),
        report.duration_ms
    );

    if let Some(path) = cli.report {
        report::write_report(&report, &path)?;
        tracing::info!("Report: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_and_options() {
        let cli = Cli::try_parse_from([
            "auctioneer",
            "auctions.yaml",
            "--output-dir",
            "out",
            "--escape",
        ])
        .unwrap();

        assert_eq!(cli.auctions_file, PathBuf::from("auctions.yaml"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(cli.escape);
        assert!(cli.report.is_none());
    }

    #[test]
    fn requires_auctions_file() {
        assert!(Cli::try_parse_from(["auctioneer"]).is_err());
    }
}
