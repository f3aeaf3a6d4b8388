// panorama-core/src/infrastructure/catalog/mod.rs

use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::catalog::MetricCatalog;
use crate::infrastructure::error::InfrastructureError;

const BUILTIN_CATALOG: &str = include_str!("default_catalog.yaml");
const BUILTIN_LABEL: &str = "<built-in>";

/// The metric table shipped with the crate.
pub fn builtin_catalog() -> Result<MetricCatalog, InfrastructureError> {
    parse_catalog(BUILTIN_CATALOG, BUILTIN_LABEL)
}

/// Parses and validates a catalog document. `origin` only labels errors.
pub fn parse_catalog(content: &str, origin: &str) -> Result<MetricCatalog, InfrastructureError> {
    let catalog: MetricCatalog = serde_yaml::from_str(content)?;
    catalog
        .validate()
        .map_err(|e| InfrastructureError::InvalidCatalog {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
    Ok(catalog)
}

/// Reads the catalog at `path`, or falls back to the built-in table.
#[instrument]
pub fn load_catalog(path: Option<&Path>) -> Result<MetricCatalog, InfrastructureError> {
    let Some(path) = path else {
        debug!("Using built-in metric catalog");
        return builtin_catalog();
    };

    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "Metric catalog not found at {:?}",
            path
        )));
    }

    let content = fs::read_to_string(path)?;
    let catalog = parse_catalog(&content, &path.display().to_string())?;
    info!(
        path = ?path,
        languages = catalog.languages.len(),
        "Loaded metric catalog"
    );
    Ok(catalog)
}
