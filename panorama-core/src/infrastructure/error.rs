// panorama-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(panorama::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(panorama::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(panorama::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(panorama::infra::config))]
    ConfigError(String),

    #[error("Panorama configuration not found at '{0}'")]
    #[diagnostic(code(panorama::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(panorama::infra::config_invalid),
        help("Check the value ranges in panorama.yaml.")
    )]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Invalid metric catalog at '{path}': {reason}")]
    #[diagnostic(
        code(panorama::infra::catalog),
        help("Every catalog entry needs a metric_id, a category and a title.")
    )]
    InvalidCatalog { path: String, reason: String },

    // --- GATE STORE (collaborator) ---
    #[error("Quality gate store rejected the request ({status}): {message}")]
    #[diagnostic(code(panorama::infra::store))]
    Store { status: u16, message: String },
}

impl InfrastructureError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::Store {
            status: 404,
            message: format!("{} not found", what),
        }
    }
}
