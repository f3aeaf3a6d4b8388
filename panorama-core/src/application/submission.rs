// panorama-core/src/application/submission.rs

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::domain::catalog::MetricOption;
use crate::domain::error::DomainError;
use crate::domain::evaluation::{
    BranchChoice, GateStatus, QualityGateResult, ResultFetch, ResultKey, Selection,
    derive_branch_options, derive_status,
};
use crate::domain::gate::{GateId, QualityGate};
use crate::domain::mutability::{ActionContext, done_blockers, should_reexecute};
use crate::domain::repository::Repository;
use crate::error::PanoramaError;
use crate::ports::gate_store::{GateOwner, GateStore};

/// What a successful save produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// The draft as saved: trimmed name, id assigned by the store.
    pub gate: QualityGate,
    pub created: bool,
    pub reexecution_requested: bool,
}

/// Creates or updates `draft`. Refused while "Done" would be disabled for the
/// metric `options` of the gate's owner; on any failure the draft is left as it was.
#[instrument(skip_all, fields(gate = %draft.name.trim(), owner = %owner.owner_id))]
pub async fn submit_gate(
    store: &dyn GateStore,
    owner: &GateOwner,
    draft: &QualityGate,
    baseline: Option<&QualityGate>,
    options: &[MetricOption],
    ctx: &ActionContext,
) -> Result<SubmitOutcome, PanoramaError> {
    let blockers = done_blockers(draft, baseline, options, ctx);
    if !blockers.is_empty() {
        let reasons = blockers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%reasons, "Quality gate not submittable");
        return Err(DomainError::GateNotSubmittable {
            gate: draft.name.trim().to_string(),
            reasons,
        }
        .into());
    }

    let reexecute = should_reexecute(draft, baseline);
    let record = draft.to_record();
    let created = !draft.is_persisted();

    let saved = if created {
        store.create(owner, &record, reexecute).await?
    } else {
        store.update(owner, &record, reexecute).await?
    };

    info!(id = ?saved.id, created, reexecute, "Quality gate saved");

    Ok(SubmitOutcome {
        gate: QualityGate {
            id: saved.id,
            name: saved.name,
            ..draft.clone()
        },
        created,
        reexecution_requested: reexecute,
    })
}

#[instrument(skip_all, fields(gate = %gate.name))]
pub async fn delete_gate(
    store: &dyn GateStore,
    owner: &GateOwner,
    gate: &QualityGate,
) -> Result<(), PanoramaError> {
    let id = persisted_id(gate)?;
    store.delete(owner, id).await?;
    info!(%id, "Quality gate deleted");
    Ok(())
}

/// Flips `isActive`. Activation never asks for a re-evaluation.
#[instrument(skip_all, fields(gate = %gate.name))]
pub async fn toggle_active(
    store: &dyn GateStore,
    owner: &GateOwner,
    gate: &QualityGate,
) -> Result<QualityGate, PanoramaError> {
    persisted_id(gate)?;
    let toggled = QualityGate {
        is_active: !gate.is_active,
        ..gate.clone()
    };
    store.update(owner, &toggled.to_record(), false).await?;
    info!(active = toggled.is_active, "Quality gate toggled");
    Ok(toggled)
}

fn persisted_id(gate: &QualityGate) -> Result<&GateId, DomainError> {
    gate.id
        .as_ref()
        .ok_or_else(|| DomainError::NotPersisted(gate.name.trim().to_string()))
}

/// Status of a gate on one branch of a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStatus {
    pub branch: BranchChoice,
    pub status: GateStatus,
    pub result: Option<QualityGateResult>,
}

/// Fetches and interprets the result for one branch.
#[instrument(skip(store, gate, repo), fields(gate = %gate.name, repo = %repo.id))]
pub async fn fetch_status(
    store: &dyn GateStore,
    gate: &QualityGate,
    repo: &Repository,
    branch: Option<&str>,
) -> Result<(GateStatus, Option<QualityGateResult>), PanoramaError> {
    let selection = Selection {
        gate: gate.id.as_ref(),
        branch,
    };
    let (Some(gate_id), Some(branch)) = (selection.gate, selection.branch) else {
        return Ok((derive_status(ResultFetch::Pending, &selection), None));
    };

    let key = ResultKey::for_repository(gate_id.clone(), repo, branch);
    let result = store.fetch_result(&key).await?;
    let status = derive_status(ResultFetch::Ready(result.as_ref()), &selection);
    Ok((status, result))
}

/// Status of `gate` on every branch it can be inspected on, fetched concurrently.
#[instrument(skip(store, gate, repo), fields(gate = %gate.name, repo = %repo.id))]
pub async fn fetch_statuses(
    store: &dyn GateStore,
    gate: &QualityGate,
    repo: &Repository,
) -> Result<Vec<BranchStatus>, PanoramaError> {
    let choices = derive_branch_options(gate, repo);

    let fetches = choices
        .iter()
        .map(|choice| fetch_status(store, gate, repo, Some(choice.name.as_str())));
    let fetched = join_all(fetches).await;

    choices
        .into_iter()
        .zip(fetched)
        .map(|(branch, fetched)| {
            let (status, result) = fetched?;
            Ok(BranchStatus {
                branch,
                status,
                result,
            })
        })
        .collect()
}
