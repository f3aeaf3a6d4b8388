// panorama-core/src/domain/diff.rs

use crate::domain::gate::QualityGate;
use serde::Serialize;
use std::mem::discriminant;

/// Order-insensitive equality: both sides are sorted by `key` (stable) and then
/// compared element by element with `PartialEq`.
pub fn unordered_equals<T, K, F>(a: &[T], b: &[T], key: F) -> bool
where
    T: PartialEq,
    K: Ord,
    F: Fn(&T) -> K,
{
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<&T> = a.iter().collect();
    let mut right: Vec<&T> = b.iter().collect();
    left.sort_by_key(|item| key(item));
    right.sort_by_key(|item| key(item));
    left == right
}

/// Which parts of a gate differ from its last saved version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GateDiff {
    pub name_changed: bool,
    pub repositories_changed: bool,
    pub branches_changed: bool,
    pub conditions_changed: bool,
}

impl GateDiff {
    pub fn between(draft: &QualityGate, baseline: &QualityGate) -> Self {
        let same_variant = discriminant(&draft.scope) == discriminant(&baseline.scope);

        let repositories_changed = draft.is_project()
            && !(same_variant
                && unordered_equals(
                    draft.linked_repositories(),
                    baseline.linked_repositories(),
                    |scope| scope.repo_id.to_string(),
                ));

        let branches_changed = !draft.is_template()
            && !(same_variant && unordered_equals(draft.branches(), baseline.branches(), |b| *b));

        Self {
            name_changed: draft.name.trim() != baseline.name.trim(),
            repositories_changed,
            branches_changed,
            conditions_changed: draft.conditions != baseline.conditions,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !(self.name_changed
            || self.repositories_changed
            || self.branches_changed
            || self.conditions_changed)
    }

    /// A rename alone never requires evaluating the gate again.
    pub fn requires_reexecution(&self) -> bool {
        self.repositories_changed || self.branches_changed || self.conditions_changed
    }
}
