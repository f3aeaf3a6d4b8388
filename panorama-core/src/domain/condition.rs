// panorama-core/src/domain/condition.rs

use crate::domain::catalog::{MetricOption, find_by_metric, find_successor};
use crate::domain::grade::Grade;
use crate::domain::metric::MetricSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
}

impl Operator {
    pub const ALL: [Operator; 5] = [Self::Lt, Self::Le, Self::Eq, Self::Ge, Self::Gt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|op| op.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown operator: {}", s))
    }
}

/// Right-hand side of a condition: a raw number or a letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Number(f64),
    Grade(Grade),
}

impl Threshold {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Grade(_) => None,
        }
    }

    /// Mirrors how form inputs treat an empty value: `0` and NaN count as unset.
    fn is_falsy(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Grade(_) => false,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Grade(g) => write!(f, "{}", g),
        }
    }
}

/// One `metric operator threshold` rule. All conditions of a gate are AND-ed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub metric: MetricSet,
    pub operator: Operator,
    pub threshold: Threshold,
}

impl Condition {
    pub fn new(metric: MetricSet, operator: Operator, threshold: Threshold) -> Self {
        Self {
            metric,
            operator,
            threshold,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.metric, self.operator, self.threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConditionViolation {
    #[error("a condition needs at least one metric")]
    EmptyMetric,
    #[error("threshold is not a number")]
    NotANumber,
    #[error("threshold cannot be negative")]
    NegativeThreshold,
    #[error("metrics are never less than zero")]
    LessThanZero,
    #[error("there is no grade lower than D-")]
    BelowLowestGrade,
    #[error("there is no grade higher than A+")]
    AboveHighestGrade,
    #[error("characteristics are scored with a letter grade")]
    GradeExpected,
    #[error("this metric takes a numeric threshold")]
    NumberExpected,
    #[error("this metric only takes whole numbers")]
    FractionalThreshold,
}

/// First invariant a condition breaks, independently of the metric catalog.
pub fn condition_violation(condition: &Condition) -> Option<ConditionViolation> {
    if condition.metric.is_empty() {
        return Some(ConditionViolation::EmptyMetric);
    }
    match (condition.operator, condition.threshold) {
        (_, Threshold::Number(n)) if n.is_nan() => Some(ConditionViolation::NotANumber),
        (_, Threshold::Number(n)) if n < 0.0 => Some(ConditionViolation::NegativeThreshold),
        (Operator::Lt, Threshold::Number(n)) if n == 0.0 => Some(ConditionViolation::LessThanZero),
        (Operator::Lt, Threshold::Grade(g)) if g.is_lowest() => {
            Some(ConditionViolation::BelowLowestGrade)
        }
        (Operator::Gt, Threshold::Grade(g)) if g.is_highest() => {
            Some(ConditionViolation::AboveHighestGrade)
        }
        _ => None,
    }
}

pub fn is_valid_condition(condition: &Condition) -> bool {
    condition_violation(condition).is_none()
}

/// Same as [`condition_violation`], plus the checks that need the metric's catalog option.
pub fn condition_violation_for(
    condition: &Condition,
    option: &MetricOption,
) -> Option<ConditionViolation> {
    if let Some(violation) = condition_violation(condition) {
        return Some(violation);
    }
    match condition.threshold {
        Threshold::Number(_) if option.category.uses_grades() => {
            Some(ConditionViolation::GradeExpected)
        }
        Threshold::Grade(_) if !option.category.uses_grades() => {
            Some(ConditionViolation::NumberExpected)
        }
        Threshold::Number(n) if option.integer_valued && n.fract() != 0.0 => {
            Some(ConditionViolation::FractionalThreshold)
        }
        _ => None,
    }
}

pub fn is_valid_condition_for(condition: &Condition, option: &MetricOption) -> bool {
    condition_violation_for(condition, option).is_none()
}

/// A condition being composed in the "add condition" row; every part may still be unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionDraft {
    pub metric: Option<MetricOption>,
    pub operator: Option<Operator>,
    pub threshold: Option<Threshold>,
}

impl ConditionDraft {
    pub fn to_condition(&self) -> Option<Condition> {
        Some(Condition::new(
            self.metric.as_ref()?.metric.clone(),
            self.operator?,
            self.threshold?,
        ))
    }
}

pub fn can_add_condition(draft: &ConditionDraft) -> bool {
    let Some(option) = &draft.metric else {
        return false;
    };
    let Some(operator) = draft.operator else {
        return false;
    };
    if draft
        .threshold
        .and_then(|t| t.as_number())
        .is_some_and(|n| n < 0.0)
    {
        return false;
    }

    if option.category.uses_grades() {
        if draft.threshold.is_none() {
            return false;
        }
    } else if operator == Operator::Lt {
        if draft.threshold.is_none_or(|t| t.is_falsy()) {
            return false;
        }
    } else if draft
        .threshold
        .is_none_or(|t| t.as_number().is_some_and(f64::is_nan))
    {
        return false;
    }

    draft
        .to_condition()
        .is_some_and(|condition| is_valid_condition_for(&condition, option))
}

/// Re-keys conditions after the eligible catalog changed (repositories added or removed).
///
/// A condition is matched to the previous option with the same metric set and
/// follows that option's title into the new catalog; if the title is gone the
/// condition is dropped. Conditions unknown to the previous catalog keep the
/// new option with the same set, or the single new option they overlap with.
pub fn reconcile_conditions_on_catalog_change(
    conditions: &[Condition],
    previous: &[MetricOption],
    new: &[MetricOption],
) -> Vec<Condition> {
    conditions
        .iter()
        .filter_map(|condition| {
            let target = match find_by_metric(previous, &condition.metric) {
                Some(old) => find_successor(new, old),
                None => find_by_metric(new, &condition.metric)
                    .or_else(|| unique_overlap(new, &condition.metric)),
            }?;
            Some(Condition {
                metric: target.metric.clone(),
                ..condition.clone()
            })
        })
        .collect()
}

fn unique_overlap<'a>(options: &'a [MetricOption], metric: &MetricSet) -> Option<&'a MetricOption> {
    let mut hits = options.iter().filter(|o| o.metric.intersects(metric));
    let first = hits.next()?;
    match hits.next() {
        Some(_) => None,
        None => Some(first),
    }
}
