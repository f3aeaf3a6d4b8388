// panorama-core/src/infrastructure/store.rs

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::evaluation::{QualityGateResult, ResultKey};
use crate::domain::gate::{GateId, QualityGateRecord};
use crate::error::PanoramaError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{read_json_or_default, write_json};
use crate::ports::gate_store::{GateOwner, GateStore};

const GATES_FILE: &str = "gates.json";
const RESULTS_FILE: &str = "results.json";

/// One gate row in `gates.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGate {
    pub owner: GateOwner,
    /// Set when the last save asked for the gate to be evaluated again.
    #[serde(default)]
    pub execution_requested: bool,
    pub gate: QualityGateRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub key: ResultKey,
    pub result: QualityGateResult,
}

/// `GateStore` over two JSON documents in a local directory.
pub struct JsonFileStore {
    dir: PathBuf,
    lock: Mutex<()>,
    sequence: AtomicU64,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let seed = Utc::now().timestamp_subsec_nanos() as u64;
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
            sequence: AtomicU64::new(seed << 20),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn gates_path(&self) -> PathBuf {
        self.dir.join(GATES_FILE)
    }

    fn results_path(&self) -> PathBuf {
        self.dir.join(RESULTS_FILE)
    }

    fn ensure_dir(&self) -> Result<(), InfrastructureError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// 24 hex characters: seconds since epoch, then a per-store counter.
    fn next_id(&self) -> GateId {
        let secs = Utc::now().timestamp() as u32;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        GateId(format!("{:08x}{:016x}", secs, seq))
    }

    pub async fn stored_gates(&self) -> Result<Vec<StoredGate>, PanoramaError> {
        let _guard = self.lock.lock().await;
        Ok(read_json_or_default(&self.gates_path())?)
    }

    /// Records an evaluation result, replacing any previous one for `key`.
    #[instrument(skip(self, result), fields(gate = %key.gate_id, branch = %key.branch))]
    pub async fn record_result(
        &self,
        key: ResultKey,
        result: QualityGateResult,
    ) -> Result<(), PanoramaError> {
        let _guard = self.lock.lock().await;
        self.ensure_dir()?;
        let path = self.results_path();
        let mut results: Vec<StoredResult> = read_json_or_default(&path)?;
        results.retain(|r| r.key != key);
        results.push(StoredResult { key, result });
        write_json(&path, &results)?;
        Ok(())
    }
}

#[async_trait]
impl GateStore for JsonFileStore {
    #[instrument(skip(self, gate), fields(owner = %owner.owner_id, surface = %owner.surface))]
    async fn create(
        &self,
        owner: &GateOwner,
        gate: &QualityGateRecord,
        should_execute_quality_gate: bool,
    ) -> Result<QualityGateRecord, PanoramaError> {
        let _guard = self.lock.lock().await;
        self.ensure_dir()?;
        let path = self.gates_path();
        let mut gates: Vec<StoredGate> = read_json_or_default(&path)?;

        let mut created = gate.clone();
        created.id = Some(self.next_id());
        created.updated_at = Some(Utc::now());

        gates.push(StoredGate {
            owner: owner.clone(),
            execution_requested: should_execute_quality_gate,
            gate: created.clone(),
        });
        write_json(&path, &gates)?;
        info!(id = ?created.id, "Quality gate created");
        Ok(created)
    }

    #[instrument(skip(self, gate), fields(owner = %owner.owner_id, surface = %owner.surface))]
    async fn update(
        &self,
        owner: &GateOwner,
        gate: &QualityGateRecord,
        should_execute_quality_gate: bool,
    ) -> Result<QualityGateRecord, PanoramaError> {
        let Some(id) = gate.id.clone() else {
            return Err(InfrastructureError::Store {
                status: 400,
                message: "quality gate id is required for an update".to_string(),
            }
            .into());
        };

        let _guard = self.lock.lock().await;
        let path = self.gates_path();
        let mut gates: Vec<StoredGate> = read_json_or_default(&path)?;

        let stored = gates
            .iter_mut()
            .find(|s| &s.owner == owner && s.gate.id.as_ref() == Some(&id))
            .ok_or_else(|| InfrastructureError::not_found(format!("quality gate {}", id)))?;

        let mut updated = gate.clone();
        updated.updated_at = Some(Utc::now());
        stored.gate = updated.clone();
        stored.execution_requested = should_execute_quality_gate;

        write_json(&path, &gates)?;
        debug!(id = %id, reexecute = should_execute_quality_gate, "Quality gate updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(owner = %owner.owner_id))]
    async fn delete(&self, owner: &GateOwner, gate_id: &GateId) -> Result<(), PanoramaError> {
        let _guard = self.lock.lock().await;
        let path = self.gates_path();
        let mut gates: Vec<StoredGate> = read_json_or_default(&path)?;

        let before = gates.len();
        gates.retain(|s| !(&s.owner == owner && s.gate.id.as_ref() == Some(gate_id)));
        if gates.len() == before {
            return Err(InfrastructureError::not_found(format!("quality gate {}", gate_id)).into());
        }

        write_json(&path, &gates)?;
        info!(id = %gate_id, "Quality gate deleted");
        Ok(())
    }

    async fn list(&self, owner: &GateOwner) -> Result<Vec<QualityGateRecord>, PanoramaError> {
        let _guard = self.lock.lock().await;
        let gates: Vec<StoredGate> = read_json_or_default(&self.gates_path())?;
        Ok(gates
            .into_iter()
            .filter(|s| &s.owner == owner)
            .map(|s| s.gate)
            .collect())
    }

    async fn fetch_result(
        &self,
        key: &ResultKey,
    ) -> Result<Option<QualityGateResult>, PanoramaError> {
        let _guard = self.lock.lock().await;
        let results: Vec<StoredResult> = read_json_or_default(&self.results_path())?;
        Ok(results.into_iter().find(|r| &r.key == key).map(|r| r.result))
    }
}
