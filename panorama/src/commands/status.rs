// panorama/src/commands/status.rs
//
// USE CASE: Evaluation status of a gate on a branch, read from the local store.

use std::path::{Path, PathBuf};

use panorama_core::application::fetch_status;
use panorama_core::domain::evaluation::label_tested_conditions;
use panorama_core::domain::gate::{QualityGate, QualityGateRecord};
use panorama_core::domain::repository::Repository;
use panorama_core::infrastructure::store::JsonFileStore;

use super::{metric_catalog, read_json, settings};

pub async fn execute(
    project_dir: &Path,
    gate: &Path,
    repo: &Path,
    branch: Option<String>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = settings(project_dir)?;
    let catalog = metric_catalog(project_dir, &config, catalog)?;
    let store = JsonFileStore::new(config.store_path(project_dir));

    let record: QualityGateRecord = read_json(gate)?;
    let repo: Repository = read_json(repo)?;
    let gate = QualityGate::from_record(&record);

    let (status, result) = fetch_status(&store, &gate, &repo, branch.as_deref()).await?;
    println!("status: {}", status);

    if let Some(result) = result {
        for label in label_tested_conditions(&result, &catalog, &repo.language) {
            println!("  {}", label);
        }
    }
    Ok(())
}
