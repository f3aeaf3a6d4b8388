// panorama-core/src/domain/repository.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque repository identifier owned by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(pub String);

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RepoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A repository linked to a project, as fetched by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(rename = "_id")]
    pub id: RepoId,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub production_branch: Option<String>,
    #[serde(default)]
    pub staging_branch: Option<String>,
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_root() -> String {
    ".".to_string()
}

impl Repository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Which branches of one repository a project gate watches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchFlags {
    #[serde(default)]
    pub is_production_branch: bool,
    #[serde(default)]
    pub is_staging_branch: bool,
    #[serde(default)]
    pub other_branches: Vec<String>,
}

impl BranchFlags {
    /// Production + staging, no extra branches: what a new project gate starts with.
    pub fn production_and_staging() -> Self {
        Self {
            is_production_branch: true,
            is_staging_branch: true,
            other_branches: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_production_branch && !self.is_staging_branch && self.other_branches.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryBranchScope {
    pub repo_id: RepoId,
    pub branches: BranchFlags,
}

impl RepositoryBranchScope {
    pub fn seeded(repo_id: RepoId) -> Self {
        Self {
            repo_id,
            branches: BranchFlags::production_and_staging(),
        }
    }
}

/// The host's project record, trimmed to what gate rules need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    #[serde(default)]
    pub linked_repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    #[default]
    Personal,
    Team,
}

impl Project {
    pub fn repo_ids(&self) -> Vec<RepoId> {
        self.linked_repositories.iter().map(|r| r.id.clone()).collect()
    }

    pub fn repository(&self, id: &RepoId) -> Option<&Repository> {
        self.linked_repositories.iter().find(|r| &r.id == id)
    }

    /// Distinct languages across the linked repositories, lower-cased.
    pub fn languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self
            .linked_repositories
            .iter()
            .map(|r| r.language.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        langs.sort();
        langs.dedup();
        langs
    }
}
