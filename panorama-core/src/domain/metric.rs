// panorama-core/src/domain/metric.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Metric family a catalog entry belongs to.
/// Only `Characteristics` is scored on the letter-grade scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    Characteristics,
    #[serde(rename = "Metric Scores")]
    MetricScores,
    Violations,
    Duplication,
    Size,
    Complexity,
    Coupling,
    Cohesion,
    Inheritance,
    Documentation,
}

impl MetricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Characteristics => "Characteristics",
            Self::MetricScores => "Metric Scores",
            Self::Violations => "Violations",
            Self::Duplication => "Duplication",
            Self::Size => "Size",
            Self::Complexity => "Complexity",
            Self::Coupling => "Coupling",
            Self::Cohesion => "Cohesion",
            Self::Inheritance => "Inheritance",
            Self::Documentation => "Documentation",
        }
    }

    pub fn uses_grades(&self) -> bool {
        matches!(self, Self::Characteristics)
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of interchangeable raw analyzer identifiers for one logical metric.
///
/// The same logical metric is reported under different keys depending on the
/// language analyzer (`LOC`, `PHPMETRICS_LOC`, `ESCOMP_LOC`, ...). Equality is
/// set equality, and the wire form is a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeSet<String>);

impl MetricSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn single(id: impl Into<String>) -> Self {
        Self::new([id])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn intersects(&self, other: &MetricSet) -> bool {
        self.0.iter().any(|id| other.0.contains(id))
    }

    pub fn union(&self, other: &MetricSet) -> MetricSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.0.insert(id.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.iter().collect();
        write!(f, "{}", ids.join("|"))
    }
}

impl<S: Into<String>> FromIterator<S> for MetricSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
