//! Generic coupling from type names mentioned in de-nested bodies.

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::tokens::contains_word;

use super::TypeGraph;

/// Count one coupling for every (declaration, declared type) pair where the
/// type's name occurs as a whole word in the declaration's de-nested body.
///
/// The scan runs in parallel over declarations against read-only text; the
/// increments are applied afterwards in a single sequential pass, so each
/// pair contributes at most once.
pub fn resolve_bodies(graph: &mut TypeGraph) {
    let names: Vec<&str> = graph.names().collect();
    let candidates = &names;

    let pairs: Vec<(String, String)> = graph
        .declarations()
        .par_iter()
        .flat_map_iter(move |decl| {
            candidates
                .iter()
                .filter(move |name| **name != decl.name)
                .filter(move |name| contains_word(&decl.denested_body, name))
                .map(move |name| (decl.name.clone(), name.to_string()))
        })
        .collect();

    debug!(pairs = pairs.len(), "body references resolved");

    for (from, to) in pairs {
        graph.couple(&from, &to);
    }
}
