//! Detection runner that orchestrates all relationship passes.

use tracing::debug;

use crate::config::Heuristics;

use super::{
    classify_fields, classify_usages, mark_singletons, resolve_bodies, resolve_signatures,
    TypeGraph,
};

/// Executes every detection pass against a type graph.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    heuristics: Heuristics,
}

impl Runner {
    /// Create a new detection runner.
    pub fn new(heuristics: Heuristics) -> Self {
        Self { heuristics }
    }

    /// Run all passes in order. Signature and body passes produce coupling
    /// counts; the field, usage and singleton passes only add relationships.
    pub fn run(&self, graph: &mut TypeGraph) {
        // Inheritance and realization from heritage clauses
        resolve_signatures(graph);

        // Name mentions in de-nested bodies
        resolve_bodies(graph);

        // Field classification comes before usages so that a field relation
        // blocks a later dependency for the same pair
        classify_fields(graph, &self.heuristics);
        classify_usages(graph);

        mark_singletons(graph, &self.heuristics);

        debug!(types = graph.len(), "detection passes complete");
    }
}
