// panorama/src/commands/check.rs
//
// USE CASE: Report Done/Reset state of a draft against its saved version.

use serde_json::json;
use std::path::{Path, PathBuf};

use panorama_core::domain::diff::GateDiff;
use panorama_core::domain::mutability::{
    ActionContext, done_blockers, is_reset_disabled, should_reexecute,
};

use super::{load_draft, load_project, metric_catalog, owner_options, print_json, settings};

pub fn execute(
    project_dir: &Path,
    draft: &Path,
    baseline: Option<PathBuf>,
    project: Option<PathBuf>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = settings(project_dir)?;
    let catalog = metric_catalog(project_dir, &config, catalog)?;
    let project = load_project(project.as_deref())?;
    let draft = load_draft(draft, project.as_ref())?;
    let baseline = baseline
        .as_deref()
        .map(|path| load_draft(path, project.as_ref()))
        .transpose()?;

    let repo_ids = project.as_ref().map(|p| p.repo_ids()).unwrap_or_default();
    let ctx = ActionContext::default();
    let options = owner_options(&catalog, project.as_ref());
    let blockers = done_blockers(&draft, baseline.as_ref(), &options, &ctx);
    let diff = baseline.as_ref().map(|b| GateDiff::between(&draft, b));

    print_json(&json!({
        "gate": draft.name.trim(),
        "type": draft.kind().to_string(),
        "done_disabled": !blockers.is_empty(),
        "blockers": blockers,
        "reset_disabled": is_reset_disabled(&draft, baseline.as_ref(), &repo_ids, &ctx),
        "should_reexecute": should_reexecute(&draft, baseline.as_ref()),
        "diff": diff,
    }))
}
