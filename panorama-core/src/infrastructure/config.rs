// panorama-core/src/infrastructure/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["panorama.yaml", ".panorama.yaml"];

/// Settings for the `panorama` tool, read from `panorama.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct PanoramaConfig {
    /// Replaces the built-in metric table when set.
    #[serde(default)]
    pub catalog_path: Option<String>,

    #[serde(default = "default_store_dir")]
    #[validate(length(min = 1, message = "store_dir cannot be empty"))]
    pub store_dir: String,

    /// How often hosts re-fetch evaluation results while one is pending.
    #[serde(default = "default_poll_interval")]
    #[validate(range(min = 1, max = 3600, message = "poll_interval_secs must be within 1..=3600"))]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub default_language: Option<String>,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            store_dir: default_store_dir(),
            poll_interval_secs: default_poll_interval(),
            default_language: None,
        }
    }
}

fn default_store_dir() -> String {
    ".panorama".to_string()
}
fn default_poll_interval() -> u64 {
    10
}

impl PanoramaConfig {
    /// `store_dir` resolved against the directory the config was loaded from.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        let dir = Path::new(&self.store_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            root.join(dir)
        }
    }

    pub fn catalog_path(&self, root: &Path) -> Option<PathBuf> {
        self.catalog_path.as_ref().map(|p| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        })
    }
}

/// Loads `panorama.yaml` (or `.panorama.yaml`) from `root`.
/// A directory without either file yields the defaults.
#[instrument(skip(root))]
pub fn load_config(root: &Path) -> Result<PanoramaConfig, InfrastructureError> {
    let mut config = match find_main_config(root) {
        Ok(config_path) => {
            info!(path = ?config_path, "Loading panorama config");
            let content = fs::read_to_string(&config_path)?;
            if content.trim().is_empty() {
                PanoramaConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        Err(InfrastructureError::ConfigNotFound(_)) => PanoramaConfig::default(),
        Err(e) => return Err(e),
    };

    apply_env_overrides(&mut config);
    config.validate()?;

    Ok(config)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides(config: &mut PanoramaConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Layers `PANORAMA_STORE_DIR` and `PANORAMA_CATALOG` on top of the file values.
pub fn apply_overrides<F>(config: &mut PanoramaConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("PANORAMA_STORE_DIR") {
        info!(old = ?config.store_dir, new = ?val, "Overriding store dir via ENV");
        config.store_dir = val;
    }
    if let Some(val) = lookup("PANORAMA_CATALOG") {
        info!(old = ?config.catalog_path, new = ?val, "Overriding catalog path via ENV");
        config.catalog_path = Some(val);
    }
}
