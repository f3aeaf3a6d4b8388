// panorama-core/src/domain/gate.rs

use crate::domain::condition::Condition;
use crate::domain::repository::{RepoId, RepositoryBranchScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(pub String);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Branch selector of an organization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BranchToken {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "productionBranch")]
    Production,
    #[serde(rename = "stagingBranch")]
    Staging,
}

impl BranchToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Production => "productionBranch",
            Self::Staging => "stagingBranch",
        }
    }
}

impl fmt::Display for BranchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Allowed selections: nothing, `["all"]`, or any subset of production/staging.
pub fn is_valid_branch_selection(branches: &[BranchToken]) -> bool {
    if branches.contains(&BranchToken::All) {
        return branches.len() == 1;
    }
    let mut sorted = branches.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted.len() == branches.len()
}

pub fn default_branches() -> Vec<BranchToken> {
    vec![BranchToken::Production, BranchToken::Staging]
}

/// Ownership tags: which context lists the gate and where edits are routed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Project,
    Organization,
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "Project"),
            Self::Organization => write!(f, "Organization"),
        }
    }
}

// --- WIRE RECORD ---

/// Quality gate exactly as the backend stores it. Which fields are meaningful
/// depends on the owner, so it is only read through [`init_draft`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GateId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_repositories: Option<Vec<RepositoryBranchScope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchToken>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

// --- AGGREGATE ---

#[derive(Debug, Clone, PartialEq)]
pub enum GateScope {
    /// Bound to a project: one branch scope per linked repository. `branches`
    /// stays `None` for stored gates that never carried the field.
    Project {
        linked_repositories: Vec<RepositoryBranchScope>,
        branches: Option<Vec<BranchToken>>,
    },
    /// Organization-wide gate applied to the selected branch kinds.
    Organization { branches: Vec<BranchToken> },
    /// Organization template: a seed for other gates, never executed itself.
    Template,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityGate {
    pub id: Option<GateId>,
    pub name: String,
    pub conditions: Vec<Condition>,
    pub is_active: bool,
    pub references: Option<References>,
    pub scope: GateScope,
}

impl QualityGate {
    /// Read-side view of a stored record, with the owner inferred from its own tags.
    /// Screens that edit a gate go through [`init_draft`] instead.
    pub fn from_record(record: &QualityGateRecord) -> Self {
        let tags = record.references.clone().unwrap_or_default();
        let scope = if record.is_template == Some(true) {
            GateScope::Template
        } else if tags.organizations == Some(true) {
            GateScope::Organization {
                branches: record.branches.clone().unwrap_or_default(),
            }
        } else if tags.projects == Some(true) || record.linked_repositories.is_some() {
            GateScope::Project {
                linked_repositories: record.linked_repositories.clone().unwrap_or_default(),
                branches: record.branches.clone(),
            }
        } else if let Some(branches) = &record.branches {
            GateScope::Organization {
                branches: branches.clone(),
            }
        } else {
            GateScope::Project {
                linked_repositories: Vec::new(),
                branches: None,
            }
        };
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            conditions: record.conditions.clone(),
            is_active: record.is_active,
            references: record.references.clone(),
            scope,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_project(&self) -> bool {
        matches!(self.scope, GateScope::Project { .. })
    }

    pub fn is_template(&self) -> bool {
        matches!(self.scope, GateScope::Template)
    }

    pub fn linked_repositories(&self) -> &[RepositoryBranchScope] {
        match &self.scope {
            GateScope::Project {
                linked_repositories,
                ..
            } => linked_repositories,
            _ => &[],
        }
    }

    pub fn branches(&self) -> &[BranchToken] {
        match &self.scope {
            GateScope::Organization { branches } => branches,
            GateScope::Project { branches, .. } => branches.as_deref().unwrap_or_default(),
            GateScope::Template => &[],
        }
    }

    pub fn scope_for(&self, repo_id: &RepoId) -> Option<&RepositoryBranchScope> {
        self.linked_repositories()
            .iter()
            .find(|s| &s.repo_id == repo_id)
    }

    /// Value of the "Type" column, also the context edits are routed to.
    pub fn kind(&self) -> GateKind {
        let organization_owned = self
            .references
            .as_ref()
            .and_then(|r| r.organizations)
            .unwrap_or(false);
        if organization_owned || !self.is_project() {
            GateKind::Organization
        } else {
            GateKind::Project
        }
    }

    pub fn to_record(&self) -> QualityGateRecord {
        let (linked_repositories, branches, is_template) = match &self.scope {
            GateScope::Project {
                linked_repositories,
                branches,
            } => (Some(linked_repositories.clone()), branches.clone(), None),
            GateScope::Organization { branches } => (None, Some(branches.clone()), Some(false)),
            GateScope::Template => (None, None, Some(true)),
        };
        QualityGateRecord {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            conditions: self.conditions.clone(),
            linked_repositories,
            branches,
            is_template,
            is_active: self.is_active,
            references: self.references.clone(),
            updated_at: None,
        }
    }
}

/// Who will own the gate being edited.
#[derive(Debug, Clone, Copy)]
pub enum DraftContext<'a> {
    /// Project screen; `repositories` are the project's current linked repositories.
    Project { repositories: &'a [RepoId] },
    Organization { template_requested: bool },
}

impl DraftContext<'_> {
    pub fn is_project(&self) -> bool {
        matches!(self, Self::Project { .. })
    }
}

/// Editable copy of `existing`, or a fresh draft when there is none.
pub fn init_draft(existing: Option<&QualityGateRecord>, ctx: &DraftContext<'_>) -> QualityGate {
    match existing {
        Some(record) => {
            let scope = match ctx {
                DraftContext::Project { .. } => GateScope::Project {
                    linked_repositories: record.linked_repositories.clone().unwrap_or_default(),
                    branches: record.branches.clone(),
                },
                DraftContext::Organization { .. } if record.is_template == Some(true) => {
                    GateScope::Template
                }
                DraftContext::Organization { .. } => GateScope::Organization {
                    branches: record.branches.clone().unwrap_or_default(),
                },
            };
            QualityGate {
                id: record.id.clone(),
                name: record.name.clone(),
                conditions: record.conditions.clone(),
                is_active: record.is_active,
                references: record.references.clone(),
                scope,
            }
        }
        None => {
            let scope = match ctx {
                DraftContext::Project { repositories } => GateScope::Project {
                    linked_repositories: seeded_scopes(repositories),
                    branches: Some(default_branches()),
                },
                DraftContext::Organization {
                    template_requested: true,
                } => GateScope::Template,
                DraftContext::Organization {
                    template_requested: false,
                } => GateScope::Organization {
                    branches: default_branches(),
                },
            };
            QualityGate {
                id: None,
                name: String::new(),
                conditions: Vec::new(),
                is_active: true,
                references: None,
                scope,
            }
        }
    }
}

pub fn seeded_scopes(repositories: &[RepoId]) -> Vec<RepositoryBranchScope> {
    repositories
        .iter()
        .cloned()
        .map(RepositoryBranchScope::seeded)
        .collect()
}

/// New value of `draft` whose conditions are copied from `template`.
pub fn seed_from_template(draft: &QualityGate, template: &QualityGateRecord) -> QualityGate {
    QualityGate {
        conditions: template.conditions.clone(),
        ..draft.clone()
    }
}
