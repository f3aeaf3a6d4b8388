// panorama-core/src/domain/evaluation.rs

use crate::domain::catalog::MetricCatalog;
use crate::domain::condition::{Condition, Operator, Threshold};
use crate::domain::gate::{BranchToken, GateId, GateScope, QualityGate};
use crate::domain::repository::{RepoId, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// --- RESULT RECORDS (computed by the analysis backend) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestedCondition {
    pub status: ResultStatus,
    pub condition: Condition,
}

/// Stored outcome of one gate run. Every field is optional: an empty object
/// means the gate never ran for the requested key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResultStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested_conditions: Option<Vec<TestedCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// What a stored result is looked up by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultKey {
    pub gate_id: GateId,
    pub repo_id: RepoId,
    pub branch: String,
    pub root: String,
    pub language: String,
}

impl ResultKey {
    pub fn for_repository(gate_id: GateId, repo: &Repository, branch: &str) -> Self {
        Self {
            gate_id,
            repo_id: repo.id.clone(),
            branch: branch.to_string(),
            root: repo.root.clone(),
            language: repo.language.clone(),
        }
    }
}

// --- STATUS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Passed,
    Failed,
    NotComputed,
    NoGate,
    NoBranch,
    NoConditions,
    Loading,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::NotComputed => "not_computed",
            Self::NoGate => "no_gate",
            Self::NoBranch => "no_branch",
            Self::NoConditions => "no_conditions",
            Self::Loading => "loading",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of the host's result request for the selected (gate, repository, branch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultFetch<'a> {
    Pending,
    Ready(Option<&'a QualityGateResult>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    pub gate: Option<&'a GateId>,
    pub branch: Option<&'a str>,
}

pub fn derive_status(fetch: ResultFetch<'_>, selection: &Selection<'_>) -> GateStatus {
    if selection.gate.is_none() {
        return GateStatus::NoGate;
    }
    if selection.branch.is_none() {
        return GateStatus::NoBranch;
    }
    let result = match fetch {
        ResultFetch::Pending => return GateStatus::Loading,
        ResultFetch::Ready(None) => return GateStatus::NotComputed,
        ResultFetch::Ready(Some(result)) => result,
    };
    if result
        .tested_conditions
        .as_ref()
        .is_some_and(|tested| tested.is_empty())
    {
        return GateStatus::NoConditions;
    }
    match result.status {
        Some(ResultStatus::Passed) => GateStatus::Passed,
        Some(ResultStatus::Failed) => GateStatus::Failed,
        None => GateStatus::NotComputed,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestedConditionLabel {
    pub title: String,
    pub operator: Operator,
    pub threshold: Threshold,
    pub passed: bool,
}

impl fmt::Display for TestedConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "passed" } else { "failed" };
        write!(f, "{} {} {} ({})", self.title, self.operator, self.threshold, mark)
    }
}

/// Human labels for the conditions a result was computed against.
pub fn label_tested_conditions(
    result: &QualityGateResult,
    catalog: &MetricCatalog,
    language: &str,
) -> Vec<TestedConditionLabel> {
    result
        .tested_conditions
        .iter()
        .flatten()
        .map(|item| TestedConditionLabel {
            title: catalog.title_for(&item.condition.metric, language),
            operator: item.condition.operator,
            threshold: item.condition.threshold,
            passed: item.status == ResultStatus::Passed,
        })
        .collect()
}

// --- BRANCH OPTIONS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    Production,
    Staging,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchChoice {
    pub name: String,
    pub kind: BranchKind,
}

impl BranchChoice {
    fn new(name: &str, kind: BranchKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

impl fmt::Display for BranchChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BranchKind::Production => write!(f, "{} (production)", self.name),
            BranchKind::Staging => write!(f, "{} (staging)", self.name),
            BranchKind::Other => write!(f, "{}", self.name),
        }
    }
}

/// Branches of `repo` the gate can be inspected on. A branch that is both the
/// production and the staging branch yields one choice per role. Production
/// and staging choices come first.
pub fn derive_branch_options(gate: &QualityGate, repo: &Repository) -> Vec<BranchChoice> {
    let production = repo.production_branch.as_deref();
    let staging = repo.staging_branch.as_deref();
    let mut choices = Vec::new();

    match &gate.scope {
        GateScope::Organization { branches } if branches.contains(&BranchToken::All) => {
            for name in &repo.branches {
                let is_production = production == Some(name.as_str());
                let is_staging = staging == Some(name.as_str());
                if is_production {
                    choices.push(BranchChoice::new(name, BranchKind::Production));
                }
                if is_staging {
                    choices.push(BranchChoice::new(name, BranchKind::Staging));
                }
                if !is_production && !is_staging {
                    choices.push(BranchChoice::new(name, BranchKind::Other));
                }
            }
        }
        GateScope::Organization { branches } => {
            if let Some(name) = production.filter(|_| branches.contains(&BranchToken::Production)) {
                choices.push(BranchChoice::new(name, BranchKind::Production));
            }
            if let Some(name) = staging.filter(|_| branches.contains(&BranchToken::Staging)) {
                choices.push(BranchChoice::new(name, BranchKind::Staging));
            }
        }
        GateScope::Project { .. } => {
            if let Some(scope) = gate.scope_for(&repo.id) {
                if let Some(name) = production.filter(|_| scope.branches.is_production_branch) {
                    choices.push(BranchChoice::new(name, BranchKind::Production));
                }
                if let Some(name) = staging.filter(|_| scope.branches.is_staging_branch) {
                    choices.push(BranchChoice::new(name, BranchKind::Staging));
                }
                for name in &scope.branches.other_branches {
                    if !choices.iter().any(|c| &c.name == name) {
                        choices.push(BranchChoice::new(name, BranchKind::Other));
                    }
                }
            }
        }
        GateScope::Template => {}
    }

    choices.sort_by_key(|c| c.kind == BranchKind::Other);
    choices
}
