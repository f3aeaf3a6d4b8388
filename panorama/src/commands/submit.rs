// panorama/src/commands/submit.rs
//
// USE CASE: Save a draft gate into the local store.

use anyhow::bail;
use std::path::{Path, PathBuf};

use panorama_core::application::submit_gate;
use panorama_core::domain::mutability::ActionContext;
use panorama_core::infrastructure::store::JsonFileStore;
use panorama_core::ports::gate_store::{ApiSurface, GateOwner};

use super::{load_draft, load_project, metric_catalog, owner_options, print_json, settings};

pub async fn execute(
    project_dir: &Path,
    draft: &Path,
    baseline: Option<PathBuf>,
    project: Option<PathBuf>,
    organization: Option<String>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = settings(project_dir)?;
    let catalog = metric_catalog(project_dir, &config, catalog)?;
    let project = load_project(project.as_deref())?;

    let owner = match (&project, organization) {
        (Some(project), _) => GateOwner::new(ApiSurface::for_project(project.kind), &project.id),
        (None, Some(org)) => GateOwner::new(ApiSurface::Organization, org),
        (None, None) => bail!("❌ Either --project or --organization is required"),
    };

    let draft = load_draft(draft, project.as_ref())?;
    let baseline = baseline
        .as_deref()
        .map(|path| load_draft(path, project.as_ref()))
        .transpose()?;

    let options = owner_options(&catalog, project.as_ref());
    let store = JsonFileStore::new(config.store_path(project_dir));
    let outcome = submit_gate(
        &store,
        &owner,
        &draft,
        baseline.as_ref(),
        &options,
        &ActionContext::default(),
    )
    .await?;

    let verb = if outcome.created { "created" } else { "updated" };
    eprintln!(
        "✨ Quality gate '{}' {} on {} ({}).",
        outcome.gate.name,
        verb,
        owner.surface,
        if outcome.reexecution_requested {
            "re-evaluation requested"
        } else {
            "no re-evaluation"
        }
    );
    print_json(&outcome.gate.to_record())
}
