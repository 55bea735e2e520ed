//! Configuration file (auctioneer.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use auctioneer_static::ImageHost;
use serde::Deserialize;

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG: &str = "auctioneer.toml";

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub images: ImageHost,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory
    pub dir: Option<PathBuf>,
    /// HTML-escape titles and descriptions
    #[serde(default)]
    pub escape: bool,
}

/// Load configuration.
///
/// An explicitly named file must exist. Without one, `auctioneer.toml` in
/// the working directory is used if present, otherwise defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if !path.exists() {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG);
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}
