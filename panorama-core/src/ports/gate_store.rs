// panorama-core/src/ports/gate_store.rs

// What the engine needs from the backend that stores gates and their results.
// The engine never talks HTTP itself; hosts plug in their own client.

use crate::domain::evaluation::{QualityGateResult, ResultKey};
use crate::domain::gate::{GateId, QualityGateRecord};
use crate::domain::repository::ProjectKind;
use crate::error::PanoramaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three families of gate endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiSurface {
    ProjectPersonal,
    ProjectTeam,
    Organization,
}

impl ApiSurface {
    pub fn for_project(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Personal => Self::ProjectPersonal,
            ProjectKind::Team => Self::ProjectTeam,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectPersonal => "project_personal",
            Self::ProjectTeam => "project_team",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApiSurface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "project_personal" | "personal" => Ok(Self::ProjectPersonal),
            "project_team" | "team" => Ok(Self::ProjectTeam),
            "organization" | "org" => Ok(Self::Organization),
            other => Err(format!("unknown API surface '{}'", other)),
        }
    }
}

/// Project or organization that owns a gate, on the surface it is reached through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOwner {
    pub surface: ApiSurface,
    pub owner_id: String,
}

impl GateOwner {
    pub fn new(surface: ApiSurface, owner_id: impl Into<String>) -> Self {
        Self {
            surface,
            owner_id: owner_id.into(),
        }
    }
}

#[async_trait]
pub trait GateStore: Send + Sync {
    /// Persists a new gate and returns it with its assigned id.
    async fn create(
        &self,
        owner: &GateOwner,
        gate: &QualityGateRecord,
        should_execute_quality_gate: bool,
    ) -> Result<QualityGateRecord, PanoramaError>;

    /// Replaces an existing gate (matched by `_id`).
    async fn update(
        &self,
        owner: &GateOwner,
        gate: &QualityGateRecord,
        should_execute_quality_gate: bool,
    ) -> Result<QualityGateRecord, PanoramaError>;

    async fn delete(&self, owner: &GateOwner, gate_id: &GateId) -> Result<(), PanoramaError>;

    async fn list(&self, owner: &GateOwner) -> Result<Vec<QualityGateRecord>, PanoramaError>;

    /// `None` when the gate never ran for this key.
    async fn fetch_result(
        &self,
        key: &ResultKey,
    ) -> Result<Option<QualityGateResult>, PanoramaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_follows_project_kind() {
        assert_eq!(
            ApiSurface::for_project(ProjectKind::Personal),
            ApiSurface::ProjectPersonal
        );
        assert_eq!(ApiSurface::for_project(ProjectKind::Team), ApiSurface::ProjectTeam);
    }

    #[test]
    fn test_surface_parses_short_names() {
        assert_eq!("team".parse::<ApiSurface>(), Ok(ApiSurface::ProjectTeam));
        assert_eq!("organization".parse::<ApiSurface>(), Ok(ApiSurface::Organization));
        assert!("galaxy".parse::<ApiSurface>().is_err());
    }
}
