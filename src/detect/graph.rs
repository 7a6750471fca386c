//! Accumulated detection state for one analysis run.
//!
//! `TypeGraph` owns every extracted declaration plus one entry per distinct
//! type name. Detection passes read declarations and write relationships
//! and coupling counts into the entries. The orchestrator creates it and
//! threads it through each pass.

use std::collections::BTreeMap;

use crate::analysis::{TypeDeclaration, TypeKind};

use super::{CouplingCounters, Relation, RelationshipSet};

/// Per-type accumulated state.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub kind: TypeKind,
    /// File of the last declaration seen with this name.
    pub file: String,
    /// Index into `TypeGraph::declarations` of the last declaration seen.
    latest: usize,
    pub relations: RelationshipSet,
    pub coupling: CouplingCounters,
}

/// All declarations and per-type state for a run.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    declarations: Vec<TypeDeclaration>,
    entries: BTreeMap<String, TypeEntry>,
}

impl TypeGraph {
    /// Build the graph from declarations in file order.
    ///
    /// A name declared more than once is one logical type: the last
    /// declaration wins for kind and body, while signature and body passes
    /// still visit every occurrence.
    pub fn new(declarations: Vec<TypeDeclaration>) -> Self {
        let mut entries: BTreeMap<String, TypeEntry> = BTreeMap::new();
        for (idx, decl) in declarations.iter().enumerate() {
            let entry = entries.entry(decl.name.clone()).or_insert_with(|| TypeEntry {
                kind: decl.kind,
                file: decl.file.clone(),
                latest: idx,
                relations: RelationshipSet::default(),
                coupling: CouplingCounters::default(),
            });
            entry.kind = decl.kind;
            entry.file = decl.file.clone();
            entry.latest = idx;
        }
        Self {
            declarations,
            entries,
        }
    }

    /// Every declaration occurrence, duplicates included.
    pub fn declarations(&self) -> &[TypeDeclaration] {
        &self.declarations
    }

    /// Distinct declared type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TypeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The declaration whose body represents `name` for field and method
    /// scanning.
    pub fn latest(&self, name: &str) -> Option<&TypeDeclaration> {
        self.entries
            .get(name)
            .and_then(|e| self.declarations.get(e.latest))
    }

    /// Count one reference from `from` to `to`: Ce of `from` and Ca of `to`
    /// each go up by one. Ignored unless both are declared and distinct.
    pub fn couple(&mut self, from: &str, to: &str) -> bool {
        if from == to || !self.is_declared(from) || !self.is_declared(to) {
            return false;
        }
        if let Some(src) = self.entries.get_mut(from) {
            src.coupling.efferent += 1;
        }
        if let Some(dst) = self.entries.get_mut(to) {
            dst.coupling.afferent += 1;
        }
        true
    }

    /// Record a relationship on `from`. See [`RelationshipSet::record`].
    pub fn record(&mut self, from: &str, relation: Relation, to: &str) -> bool {
        match self.entries.get_mut(from) {
            Some(entry) => entry.relations.record(relation, to),
            None => false,
        }
    }

    pub fn mark_singleton(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.relations.singleton = true;
        }
    }

    /// Consume the graph, yielding the per-type entries.
    pub fn into_entries(self) -> BTreeMap<String, TypeEntry> {
        self.entries
    }
}
