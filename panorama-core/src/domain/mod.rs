// panorama-core/src/domain/mod.rs

pub mod catalog;
pub mod condition;
pub mod diff;
pub mod error;
pub mod evaluation;
pub mod gate;
pub mod grade;
pub mod metric;
pub mod mutability;
pub mod repository;

// Re-exports
pub use catalog::{MetricCatalog, MetricOption, resolve_eligible_metrics};
pub use condition::{
    Condition, ConditionDraft, ConditionViolation, Operator, Threshold, can_add_condition,
    is_valid_condition, reconcile_conditions_on_catalog_change,
};
pub use diff::{GateDiff, unordered_equals};
pub use error::DomainError;
pub use evaluation::{
    BranchChoice, BranchKind, GateStatus, QualityGateResult, ResultFetch, ResultKey, Selection,
    derive_branch_options, derive_status, label_tested_conditions,
};
pub use gate::{BranchToken, DraftContext, GateId, GateScope, QualityGate, QualityGateRecord, init_draft};
pub use grade::Grade;
pub use metric::{MetricCategory, MetricSet};
pub use mutability::{
    ActionContext, DoneBlocker, is_done_disabled, is_reset_disabled, should_reexecute,
};
pub use repository::{Project, RepoId, Repository, RepositoryBranchScope};
