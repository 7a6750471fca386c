//! Core types for relationship detection results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Kind of relationship from one type to another.
///
/// Variants are ordered from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Extends,
    Implements,
    Composition,
    Aggregation,
    Association,
    Dependency,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Extends,
        Relation::Implements,
        Relation::Composition,
        Relation::Aggregation,
        Relation::Association,
        Relation::Dependency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Extends => "extends",
            Relation::Implements => "implements",
            Relation::Composition => "composition",
            Relation::Aggregation => "aggregation",
            Relation::Association => "association",
            Relation::Dependency => "dependency",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outgoing relationships of a single type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSet {
    pub extends: BTreeSet<String>,
    pub implements: BTreeSet<String>,
    pub compositions: BTreeSet<String>,
    pub aggregations: BTreeSet<String>,
    pub associations: BTreeSet<String>,
    pub dependencies: BTreeSet<String>,
    pub singleton: bool,
}

impl RelationshipSet {
    pub fn targets(&self, relation: Relation) -> &BTreeSet<String> {
        match relation {
            Relation::Extends => &self.extends,
            Relation::Implements => &self.implements,
            Relation::Composition => &self.compositions,
            Relation::Aggregation => &self.aggregations,
            Relation::Association => &self.associations,
            Relation::Dependency => &self.dependencies,
        }
    }

    fn targets_mut(&mut self, relation: Relation) -> &mut BTreeSet<String> {
        match relation {
            Relation::Extends => &mut self.extends,
            Relation::Implements => &mut self.implements,
            Relation::Composition => &mut self.compositions,
            Relation::Aggregation => &mut self.aggregations,
            Relation::Association => &mut self.associations,
            Relation::Dependency => &mut self.dependencies,
        }
    }

    /// The first recorded non-dependency relationship to `target`, if any.
    pub fn strongest(&self, target: &str) -> Option<Relation> {
        Relation::ALL
            .into_iter()
            .filter(|r| *r != Relation::Dependency)
            .find(|r| self.targets(*r).contains(target))
    }

    /// Whether any relationship stronger than a dependency exists to `target`.
    pub fn has_stronger_than_dependency(&self, target: &str) -> bool {
        self.strongest(target).is_some()
    }

    /// Record a relationship, keeping the invariant that a target sits in at
    /// most one non-dependency set and that dependencies only exist where
    /// nothing stronger does. Returns whether the set changed.
    pub fn record(&mut self, relation: Relation, target: &str) -> bool {
        if self.has_stronger_than_dependency(target) {
            return false;
        }
        if relation != Relation::Dependency {
            self.dependencies.remove(target);
        }
        self.targets_mut(relation).insert(target.to_string())
    }

    /// Iterate over every `(relation, target)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (Relation, &str)> {
        Relation::ALL
            .into_iter()
            .flat_map(move |r| self.targets(r).iter().map(move |t| (r, t.as_str())))
    }

    /// Total number of recorded relationships.
    pub fn len(&self) -> usize {
        Relation::ALL.iter().map(|r| self.targets(*r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Afferent (incoming) and efferent (outgoing) coupling counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingCounters {
    /// Ca: incoming references.
    pub afferent: usize,
    /// Ce: outgoing references.
    pub efferent: usize,
}

impl CouplingCounters {
    pub fn total(&self) -> usize {
        self.afferent + self.efferent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_structural_relation_wins() {
        let mut set = RelationshipSet::default();
        assert!(set.record(Relation::Composition, "Engine"));
        assert!(!set.record(Relation::Association, "Engine"));
        assert!(!set.record(Relation::Aggregation, "Engine"));
        assert_eq!(set.strongest("Engine"), Some(Relation::Composition));
        assert!(set.associations.is_empty());
    }

    #[test]
    fn test_dependency_only_without_stronger() {
        let mut set = RelationshipSet::default();
        set.record(Relation::Extends, "Base");
        assert!(!set.record(Relation::Dependency, "Base"));
        assert!(set.record(Relation::Dependency, "Helper"));
        assert!(set.dependencies.contains("Helper"));
    }

    #[test]
    fn test_stronger_relation_replaces_dependency() {
        let mut set = RelationshipSet::default();
        set.record(Relation::Dependency, "Logger");
        assert!(set.record(Relation::Association, "Logger"));
        assert!(!set.dependencies.contains("Logger"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_and_parse() {
        let mut set = RelationshipSet::default();
        set.record(Relation::Implements, "Runnable");
        set.record(Relation::Dependency, "Clock");
        let pairs: Vec<_> = set.iter().collect();
        assert_eq!(
            pairs,
            vec![(Relation::Implements, "Runnable"), (Relation::Dependency, "Clock")]
        );
        assert_eq!(Relation::Aggregation.to_string(), "aggregation");
    }
}
