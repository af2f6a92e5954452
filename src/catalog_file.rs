//! Loading the product catalog and building the recommendation engine.
//!
//! Without `[catalog] path` the built-in catalog is used. A catalog file
//! is TOML with one `[[sections]]` table per section:
//!
//! ```toml
//! [[sections]]
//! name = "engine"
//!
//! [[sections.products]]
//! id = "B08K4X7QRY"
//! name = "NGK Iridium IX Spark Plugs"
//! category = "Engine"
//! price = "$89.99"
//! rating = 4.8
//! description = "High-Performance Iridium Spark Plugs Set"
//! keywords = ["spark plugs", "ngk", "iridium", "performance"]
//! compatibleVehicles = ["universal"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use dreamcar_core::catalog::{Catalog, CatalogSection};
use dreamcar_core::recommend::RecommendationEngine;
use serde::Deserialize;

use crate::config::Config;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sections: Vec<CatalogSection>,
}

pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let file: CatalogFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
    let catalog = Catalog::new(file.sections)
        .with_context(|| format!("Invalid catalog file: {}", path.display()))?;
    tracing::debug!(products = catalog.len(), path = %path.display(), "loaded catalog");
    Ok(catalog)
}

/// Build the engine once at startup from configuration.
pub fn load_engine(config: &Config) -> Result<RecommendationEngine> {
    let catalog = match &config.catalog.path {
        Some(path) => load_catalog_file(path)?,
        None => Catalog::default(),
    };
    Ok(RecommendationEngine::new(catalog, config.affiliate.clone()))
}
