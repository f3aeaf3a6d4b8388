// panorama/src/commands/mod.rs
//
// Helpers shared by the subcommands: input files, config, catalog.

pub mod branches;
pub mod check;
pub mod metrics;
pub mod reconcile;
pub mod status;
pub mod submit;

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use panorama_core::application::{eligible_metrics_for_organization, eligible_metrics_for_project};
use panorama_core::domain::catalog::{MetricCatalog, MetricOption};
use panorama_core::domain::gate::{DraftContext, QualityGate, QualityGateRecord, init_draft};
use panorama_core::domain::repository::{Project, RepoId};
use panorama_core::infrastructure::catalog::load_catalog;
use panorama_core::infrastructure::config::{PanoramaConfig, load_config};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON at {:?}", path))
}

pub fn settings(project_dir: &Path) -> anyhow::Result<PanoramaConfig> {
    Ok(load_config(project_dir)?)
}

/// `--catalog` wins over `catalog_path` from panorama.yaml; neither means built-in.
pub fn metric_catalog(
    project_dir: &Path,
    config: &PanoramaConfig,
    override_path: Option<PathBuf>,
) -> anyhow::Result<MetricCatalog> {
    let path = override_path.or_else(|| config.catalog_path(project_dir));
    Ok(load_catalog(path.as_deref())?)
}

/// Metrics a gate may use: the project's languages, or every catalog language
/// for organization gates.
pub fn owner_options(catalog: &MetricCatalog, project: Option<&Project>) -> Vec<MetricOption> {
    match project {
        Some(project) => eligible_metrics_for_project(catalog, project),
        None => eligible_metrics_for_organization(catalog),
    }
}

/// Loads a gate record for editing, owned by `project` when given and by an
/// organization otherwise.
pub fn load_draft(path: &Path, project: Option<&Project>) -> anyhow::Result<QualityGate> {
    let record: QualityGateRecord = read_json(path)?;
    let repositories: Vec<RepoId> = project.map(Project::repo_ids).unwrap_or_default();
    let ctx = match project {
        Some(_) => DraftContext::Project {
            repositories: &repositories,
        },
        None => DraftContext::Organization {
            template_requested: false,
        },
    };
    Ok(init_draft(Some(&record), &ctx))
}

pub fn load_project(path: Option<&Path>) -> anyhow::Result<Option<Project>> {
    path.map(read_json).transpose()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
