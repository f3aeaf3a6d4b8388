// panorama/src/commands/branches.rs
//
// USE CASE: Branches a gate can be inspected on for one repository.

use std::path::Path;

use panorama_core::domain::evaluation::derive_branch_options;
use panorama_core::domain::gate::{QualityGate, QualityGateRecord};
use panorama_core::domain::repository::Repository;

use super::read_json;

pub fn execute(gate: &Path, repo: &Path) -> anyhow::Result<()> {
    let record: QualityGateRecord = read_json(gate)?;
    let repo: Repository = read_json(repo)?;
    let gate = QualityGate::from_record(&record);

    let choices = derive_branch_options(&gate, &repo);
    if choices.is_empty() {
        println!("No branch of {} is watched by '{}'.", repo.full_name(), gate.name);
        return Ok(());
    }
    for choice in choices {
        println!("{}", choice);
    }
    Ok(())
}
