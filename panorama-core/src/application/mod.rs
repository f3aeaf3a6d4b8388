// panorama-core/src/application/mod.rs

pub mod metrics;
pub mod submission;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use panorama_core::application::{submit_gate, fetch_statuses};`

pub use metrics::{
    eligible_metrics_for_organization, eligible_metrics_for_project, reconcile_gate_for_languages,
};
pub use submission::{
    BranchStatus, SubmitOutcome, delete_gate, fetch_status, fetch_statuses, submit_gate,
    toggle_active,
};
