// panorama-core/src/domain/mutability.rs

use crate::domain::catalog::{MetricOption, find_by_metric};
use crate::domain::condition::{
    Condition, ConditionViolation, condition_violation, condition_violation_for,
};
use crate::domain::diff::{GateDiff, unordered_equals};
use crate::domain::gate::{GateScope, QualityGate, default_branches, is_valid_branch_selection, seeded_scopes};
use crate::domain::repository::RepoId;
use serde::Serialize;
use thiserror::Error;

/// Requests the host currently has in flight for this gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    pub is_submitting: bool,
    pub is_updating: bool,
}

impl ActionContext {
    pub fn in_flight(&self) -> bool {
        self.is_submitting || self.is_updating
    }
}

/// Why "Done" is disabled. Hosts show these as inline hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DoneBlocker {
    #[error("a request for this gate is still running")]
    InFlight,
    #[error("the gate needs a name")]
    EmptyName,
    #[error("the gate needs at least one condition")]
    NoConditions,
    #[error("select at least one repository")]
    NoRepositories,
    #[error("select at least one branch")]
    NoBranches,
    #[error("'all' cannot be combined with other branch selections")]
    InvalidBranchSelection,
    #[error("condition #{index} is invalid: {violation}")]
    InvalidCondition {
        index: usize,
        #[serde(serialize_with = "serialize_violation")]
        violation: ConditionViolation,
    },
    #[error("nothing changed since the last save")]
    Unchanged,
}

fn serialize_violation<S: serde::Serializer>(
    violation: &ConditionViolation,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(violation)
}

/// Every reason the "Done" action is disabled, in display order.
/// `options` are the metrics eligible for the gate's owner.
pub fn done_blockers(
    draft: &QualityGate,
    baseline: Option<&QualityGate>,
    options: &[MetricOption],
    ctx: &ActionContext,
) -> Vec<DoneBlocker> {
    let mut blockers = Vec::new();

    if ctx.in_flight() {
        blockers.push(DoneBlocker::InFlight);
    }
    if draft.name.trim().is_empty() {
        blockers.push(DoneBlocker::EmptyName);
    }
    if draft.conditions.is_empty() {
        blockers.push(DoneBlocker::NoConditions);
    }
    let required_branches = match &draft.scope {
        GateScope::Project {
            linked_repositories,
            branches,
        } => {
            if linked_repositories.is_empty() {
                blockers.push(DoneBlocker::NoRepositories);
            }
            branches.as_deref()
        }
        GateScope::Organization { branches } => Some(branches.as_slice()),
        GateScope::Template => None,
    };
    if let Some(branches) = required_branches {
        if branches.is_empty() {
            blockers.push(DoneBlocker::NoBranches);
        } else if !is_valid_branch_selection(branches) {
            blockers.push(DoneBlocker::InvalidBranchSelection);
        }
    }
    for (index, condition) in draft.conditions.iter().enumerate() {
        if let Some(violation) = violation_against(condition, options) {
            blockers.push(DoneBlocker::InvalidCondition { index, violation });
        }
    }
    if let Some(baseline) = baseline {
        if GateDiff::between(draft, baseline).is_unchanged() {
            blockers.push(DoneBlocker::Unchanged);
        }
    }

    blockers
}

// A condition whose metric is not offered any more is still held to the
// catalog-free rules.
fn violation_against(condition: &Condition, options: &[MetricOption]) -> Option<ConditionViolation> {
    let option = find_by_metric(options, &condition.metric)
        .or_else(|| options.iter().find(|o| o.metric.intersects(&condition.metric)));
    match option {
        Some(option) => condition_violation_for(condition, option),
        None => condition_violation(condition),
    }
}

pub fn is_done_disabled(
    draft: &QualityGate,
    baseline: Option<&QualityGate>,
    options: &[MetricOption],
    ctx: &ActionContext,
) -> bool {
    !done_blockers(draft, baseline, options, ctx).is_empty()
}

/// "Reset" is pointless while a request runs or when there is nothing to undo.
pub fn is_reset_disabled(
    draft: &QualityGate,
    baseline: Option<&QualityGate>,
    project_repos: &[RepoId],
    ctx: &ActionContext,
) -> bool {
    if ctx.in_flight() {
        return true;
    }
    match baseline {
        Some(baseline) => GateDiff::between(draft, baseline).is_unchanged(),
        None => is_pristine(draft, project_repos),
    }
}

/// True when `draft` still has the shape a brand new draft starts with.
pub fn is_pristine(draft: &QualityGate, project_repos: &[RepoId]) -> bool {
    if !draft.name.trim().is_empty() || !draft.conditions.is_empty() {
        return false;
    }
    match &draft.scope {
        GateScope::Project {
            linked_repositories,
            branches,
        } => {
            unordered_equals(linked_repositories, &seeded_scopes(project_repos), |s| {
                s.repo_id.to_string()
            }) && branches
                .as_deref()
                .is_none_or(|b| unordered_equals(b, &default_branches(), |b| *b))
        }
        GateScope::Organization { branches } => {
            unordered_equals(branches, &default_branches(), |b| *b)
        }
        GateScope::Template => true,
    }
}

/// Whether saving `draft` must ask the backend to evaluate the gate again.
/// Only edits of an already persisted gate qualify.
pub fn should_reexecute(draft: &QualityGate, baseline: Option<&QualityGate>) -> bool {
    match baseline {
        Some(baseline) if baseline.is_persisted() => {
            GateDiff::between(draft, baseline).requires_reexecution()
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::condition::{Operator, Threshold};
    use crate::domain::gate::{BranchToken, DraftContext, GateId, init_draft};
    use crate::domain::grade::Grade;
    use crate::domain::metric::{MetricCategory, MetricSet};
    use crate::domain::repository::RepositoryBranchScope;

    fn repos() -> Vec<RepoId> {
        vec![RepoId::from("r1"), RepoId::from("r2")]
    }

    fn options() -> Vec<MetricOption> {
        vec![
            MetricOption {
                title: "Maintainability".into(),
                category: MetricCategory::Characteristics,
                metric: MetricSet::single("MAINTAINABILITY"),
                integer_valued: false,
            },
            MetricOption {
                title: "(Class) Size in Lines of Code".into(),
                category: MetricCategory::Size,
                metric: MetricSet::new(["LOC", "PHPMETRICS_LOC"]),
                integer_valued: true,
            },
        ]
    }

    fn blockers_of(draft: &QualityGate, baseline: Option<&QualityGate>) -> Vec<DoneBlocker> {
        done_blockers(draft, baseline, &options(), &ActionContext::default())
    }

    fn done_disabled(draft: &QualityGate, baseline: Option<&QualityGate>) -> bool {
        is_done_disabled(draft, baseline, &options(), &ActionContext::default())
    }

    fn loc_condition(threshold: f64) -> Condition {
        Condition::new(MetricSet::single("LOC"), Operator::Le, Threshold::Number(threshold))
    }

    fn saved_project_gate() -> QualityGate {
        let repos = repos();
        let mut gate = init_draft(None, &DraftContext::Project { repositories: &repos });
        gate.id = Some(GateId::from("g1"));
        gate.name = "Strict".into();
        gate.conditions = vec![loc_condition(400.0)];
        gate
    }

    #[test]
    fn test_fresh_copy_of_baseline_cannot_be_done() {
        let baseline = saved_project_gate();
        let draft = baseline.clone();
        let blockers = blockers_of(&draft, Some(&baseline));
        assert_eq!(blockers, vec![DoneBlocker::Unchanged]);
        assert!(done_disabled(&draft, Some(&baseline)));
    }

    #[test]
    fn test_adding_a_valid_condition_enables_done() {
        let repos = repos();
        let mut draft = init_draft(None, &DraftContext::Project { repositories: &repos });
        draft.name = "New gate".into();
        assert!(done_disabled(&draft, None));

        draft.conditions.push(loc_condition(300.0));
        assert!(!done_disabled(&draft, None));
    }

    #[test]
    fn test_in_flight_requests_disable_everything() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        draft.name = "Other".into();
        let busy = ActionContext {
            is_submitting: false,
            is_updating: true,
        };
        assert!(is_done_disabled(&draft, Some(&baseline), &options(), &busy));
        assert!(is_reset_disabled(&draft, Some(&baseline), &repos(), &busy));
    }

    #[test]
    fn test_project_gate_needs_repositories() {
        let mut draft = saved_project_gate();
        draft.id = None;
        draft.scope = GateScope::Project {
            linked_repositories: vec![],
            branches: Some(default_branches()),
        };
        let blockers = blockers_of(&draft, None);
        assert_eq!(blockers, vec![DoneBlocker::NoRepositories]);
    }

    #[test]
    fn test_organization_gate_needs_branches_but_template_does_not() {
        let mut gate = init_draft(
            None,
            &DraftContext::Organization {
                template_requested: false,
            },
        );
        gate.name = "Org".into();
        gate.conditions = vec![loc_condition(10.0)];
        gate.scope = GateScope::Organization { branches: vec![] };
        assert_eq!(
            blockers_of(&gate, None),
            vec![DoneBlocker::NoBranches]
        );

        gate.scope = GateScope::Template;
        assert!(!done_disabled(&gate, None));
    }

    #[test]
    fn test_project_gate_needs_branches_when_it_carries_them() {
        let mut draft = saved_project_gate();
        draft.id = None;
        draft.scope = GateScope::Project {
            linked_repositories: seeded_scopes(&repos()),
            branches: Some(vec![]),
        };
        assert_eq!(blockers_of(&draft, None), vec![DoneBlocker::NoBranches]);

        draft.scope = GateScope::Project {
            linked_repositories: seeded_scopes(&repos()),
            branches: None,
        };
        assert!(blockers_of(&draft, None).is_empty());
    }

    #[test]
    fn test_project_branch_change_is_a_change() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        draft.scope = GateScope::Project {
            linked_repositories: seeded_scopes(&repos()),
            branches: Some(vec![BranchToken::Production]),
        };
        assert!(!done_disabled(&draft, Some(&baseline)));
        assert!(should_reexecute(&draft, Some(&baseline)));
    }

    #[test]
    fn test_threshold_kind_follows_metric_category() {
        let mut draft = saved_project_gate();
        draft.id = None;
        draft.conditions = vec![Condition::new(
            MetricSet::single("LOC"),
            Operator::Ge,
            Threshold::Grade(Grade::B),
        )];
        assert_eq!(
            blockers_of(&draft, None),
            vec![DoneBlocker::InvalidCondition {
                index: 0,
                violation: ConditionViolation::NumberExpected
            }]
        );

        draft.conditions = vec![Condition::new(
            MetricSet::single("MAINTAINABILITY"),
            Operator::Ge,
            Threshold::Number(3.0),
        )];
        assert_eq!(
            blockers_of(&draft, None),
            vec![DoneBlocker::InvalidCondition {
                index: 0,
                violation: ConditionViolation::GradeExpected
            }]
        );

        draft.conditions = vec![Condition::new(
            MetricSet::single("MAINTAINABILITY"),
            Operator::Ge,
            Threshold::Grade(Grade::B),
        )];
        assert!(!done_disabled(&draft, None));
    }

    #[test]
    fn test_invalid_conditions_are_reported_by_index() {
        let mut draft = saved_project_gate();
        draft.id = None;
        draft.conditions.push(Condition::new(
            MetricSet::single("MI"),
            Operator::Lt,
            Threshold::Grade(Grade::DMinus),
        ));
        let blockers = blockers_of(&draft, None);
        assert_eq!(
            blockers,
            vec![DoneBlocker::InvalidCondition {
                index: 1,
                violation: ConditionViolation::BelowLowestGrade
            }]
        );
    }

    #[test]
    fn test_repository_order_is_not_a_change() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        if let GateScope::Project {
            linked_repositories,
            ..
        } = &mut draft.scope
        {
            linked_repositories.reverse();
        }
        assert!(done_disabled(&draft, Some(&baseline)));
        assert!(!should_reexecute(&draft, Some(&baseline)));
    }

    #[test]
    fn test_reset_on_new_draft_tracks_pristine_shape() {
        let repos = repos();
        let mut draft = init_draft(None, &DraftContext::Project { repositories: &repos });
        assert!(is_reset_disabled(&draft, None, &repos, &ActionContext::default()));

        draft.name = "x".into();
        assert!(!is_reset_disabled(&draft, None, &repos, &ActionContext::default()));

        draft.name.clear();
        draft.scope = GateScope::Project {
            linked_repositories: vec![RepositoryBranchScope::seeded(RepoId::from("r2"))],
            branches: Some(default_branches()),
        };
        assert!(!is_reset_disabled(&draft, None, &repos, &ActionContext::default()));
    }

    #[test]
    fn test_reset_on_existing_gate_tracks_baseline() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        assert!(is_reset_disabled(&draft, Some(&baseline), &repos(), &ActionContext::default()));
        draft.conditions.clear();
        assert!(!is_reset_disabled(&draft, Some(&baseline), &repos(), &ActionContext::default()));
    }

    #[test]
    fn test_should_reexecute_only_for_persisted_gates() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        draft.conditions[0] = loc_condition(350.0);
        assert!(should_reexecute(&draft, Some(&baseline)));

        let mut unsaved = baseline.clone();
        unsaved.id = None;
        assert!(!should_reexecute(&draft, Some(&unsaved)));
        assert!(!should_reexecute(&draft, None));
    }

    #[test]
    fn test_should_reexecute_ignores_rename() {
        let baseline = saved_project_gate();
        let mut draft = baseline.clone();
        draft.name = "Renamed".into();
        assert!(!should_reexecute(&draft, Some(&baseline)));
        assert!(!done_disabled(&draft, Some(&baseline)));
    }

    #[test]
    fn test_branch_change_on_organization_gate_requires_reexecution() {
        let ctx = DraftContext::Organization {
            template_requested: false,
        };
        let mut baseline = init_draft(None, &ctx);
        baseline.id = Some(GateId::from("g2"));
        baseline.name = "Org".into();
        baseline.conditions = vec![loc_condition(100.0)];
        let mut draft = baseline.clone();
        draft.scope = GateScope::Organization {
            branches: vec![BranchToken::All],
        };
        assert!(should_reexecute(&draft, Some(&baseline)));
    }
}
