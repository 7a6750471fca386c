//! Singleton pattern detection.

use tracing::debug;

use crate::analysis::tokens::{contains_word, lookback, word_positions};
use crate::analysis::TypeDeclaration;
use crate::config::Heuristics;

use super::patterns::{declarator_after, field_declaration_at};
use super::TypeGraph;

/// Method names recognized as singleton accessors.
pub const ACCESSOR_NAMES: &[&str] = &["getInstance", "instance", "get"];

fn has_modifiers(window: &str, modifiers: &[&str]) -> bool {
    modifiers.iter().all(|m| contains_word(window, m))
}

/// Check whether a declaration holds both halves of the singleton pattern:
/// a `private static` field of its own type and a `public static` accessor
/// returning its own type.
pub fn is_singleton(decl: &TypeDeclaration, heuristics: &Heuristics) -> bool {
    let body = decl.body.as_str();
    let name = decl.name.as_str();
    let window = heuristics.modifier_window;

    let mut has_instance = false;
    let mut has_accessor = false;

    for pos in word_positions(body, name) {
        let modifiers = lookback(body, pos, window);
        if !has_instance
            && field_declaration_at(body, pos, name).is_some()
            && has_modifiers(modifiers, &["private", "static"])
        {
            has_instance = true;
        }
        if !has_accessor && has_modifiers(modifiers, &["public", "static"]) {
            has_accessor = declarator_after(body, pos, name)
                .map(|(method, cursor)| {
                    ACCESSOR_NAMES.contains(&method) && cursor.peek() == Some(b'(')
                })
                .unwrap_or(false);
        }
        if has_instance && has_accessor {
            return true;
        }
    }
    false
}

/// Flag every declared type whose representative declaration is a
/// singleton.
pub fn mark_singletons(graph: &mut TypeGraph, heuristics: &Heuristics) {
    let singletons: Vec<String> = graph
        .names()
        .filter_map(|name| graph.latest(name))
        .filter(|decl| is_singleton(decl, heuristics))
        .map(|decl| decl.name.clone())
        .collect();

    for name in &singletons {
        debug!(name = %name, "singleton detected");
        graph.mark_singleton(name);
    }
}
