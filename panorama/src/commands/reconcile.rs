// panorama/src/commands/reconcile.rs
//
// USE CASE: Follow conditions through a change of project languages.

use std::path::{Path, PathBuf};

use panorama_core::application::reconcile_gate_for_languages;
use panorama_core::domain::gate::{QualityGate, QualityGateRecord};

use super::{metric_catalog, print_json, read_json, settings};

pub fn execute(
    project_dir: &Path,
    gate: &Path,
    from: Vec<String>,
    to: Vec<String>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = settings(project_dir)?;
    let catalog = metric_catalog(project_dir, &config, catalog)?;

    let record: QualityGateRecord = read_json(gate)?;
    let gate = QualityGate::from_record(&record);
    let reconciled = reconcile_gate_for_languages(&gate, &catalog, &from, &to);

    let dropped = gate.conditions.len() - reconciled.conditions.len();
    if dropped > 0 {
        eprintln!("⚠️  {} condition(s) dropped: their metric is no longer available.", dropped);
    }

    print_json(&reconciled.to_record())
}
