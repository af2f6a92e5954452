//! TOML configuration.
//!
//! Every section is optional; a missing file section falls back to the
//! built-in defaults, and the CLI runs with [`Config::default`] when no
//! `--config` is given.
//!
//! ```toml
//! [affiliate]
//! associate_tag = "dreamcar-20"
//! base_url = "https://www.amazon.com"
//! image_host = "https://images-na.ssl-images-amazon.com"
//! image_size = "_SX300_"
//!
//! [vin]
//! api_base = "https://vpic.nhtsa.dot.gov/api/vehicles"
//! timeout_secs = 10
//!
//! [counters]
//! path = "./data/counters.json"
//!
//! [catalog]
//! path = "./config/catalog.toml"   # optional; built-in catalog otherwise
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use dreamcar_core::affiliate::AffiliateConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub affiliate: AffiliateConfig,
    #[serde(default)]
    pub vin: VinConfig,
    #[serde(default)]
    pub counters: CountersConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VinConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://vpic.nhtsa.dot.gov/api/vehicles".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for VinConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CountersConfig {
    #[serde(default = "default_counters_path")]
    pub path: PathBuf,
}

fn default_counters_path() -> PathBuf {
    PathBuf::from("./data/counters.json")
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            path: default_counters_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// TOML catalog file; the built-in catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `DREAMCAR_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.affiliate.associate_tag.trim().is_empty() {
        anyhow::bail!("affiliate.associate_tag must not be empty");
    }

    for (name, url) in [
        ("affiliate.base_url", &config.affiliate.base_url),
        ("affiliate.image_host", &config.affiliate.image_host),
        ("vin.api_base", &config.vin.api_base),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("{} must be an http(s) URL, got '{}'", name, url);
        }
    }

    if config.vin.timeout_secs == 0 {
        anyhow::bail!("vin.timeout_secs must be > 0");
    }

    Ok(())
}
