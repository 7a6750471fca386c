//! Method-level usage: singleton accessor calls and transient dependencies.

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::tokens::{prev_non_ws, word_positions, Cursor};
use crate::analysis::TypeDeclaration;

use super::patterns::{is_local_variable_at, is_parameter_at, is_return_type_at, type_use_at};
use super::singleton::ACCESSOR_NAMES;
use super::{Relation, TypeGraph};

/// `Type.getInstance(`, `Type.instance(` or `Type.get(` at `pos`.
pub fn is_accessor_call_at(text: &str, pos: usize, type_name: &str) -> bool {
    if let Some((_, b'.')) = prev_non_ws(text, pos) {
        return false;
    }
    let mut cursor = Cursor::new(text, pos + type_name.len());
    cursor.skip_ws();
    if !cursor.eat(b'.') {
        return false;
    }
    cursor.skip_ws();
    let Some(method) = cursor.ident() else {
        return false;
    };
    cursor.skip_ws();
    ACCESSOR_NAMES.contains(&method) && cursor.peek() == Some(b'(')
}

/// Whether `type_name` is used as a parameter, return type or local
/// variable type anywhere in `body`.
pub fn is_transient_use(body: &str, type_name: &str) -> bool {
    word_positions(body, type_name).any(|pos| {
        let (at, ty) = type_use_at(body, pos, type_name);
        is_parameter_at(body, at, ty)
            || is_return_type_at(body, at, ty)
            || is_local_variable_at(body, at, ty)
    })
}

fn usage_relations(
    decl: &TypeDeclaration,
    type_names: &[&str],
) -> Vec<(String, Relation, String)> {
    let body = decl.denested_body.as_str();
    let others = || type_names.iter().copied().filter(|n| *n != decl.name);

    let accessors = others()
        .filter(|ty| word_positions(body, ty).any(|pos| is_accessor_call_at(body, pos, ty)))
        .map(|ty| (Relation::Association, ty));
    let transient = others()
        .filter(|ty| is_transient_use(body, ty))
        .map(|ty| (Relation::Dependency, ty));

    accessors
        .chain(transient)
        .map(|(relation, ty)| (decl.name.clone(), relation, ty.to_string()))
        .collect()
}

/// Record singleton-accessor associations, then dependencies for declared
/// types that have no stronger relationship yet.
pub fn classify_usages(graph: &mut TypeGraph) {
    let names: Vec<&str> = graph.names().collect();
    let owners: Vec<&TypeDeclaration> = names.iter().filter_map(|n| graph.latest(n)).collect();

    let edges: Vec<(String, Relation, String)> = owners
        .par_iter()
        .flat_map_iter(|decl| usage_relations(decl, &names))
        .collect();

    debug!(usages = edges.len(), "method usages classified");

    for (from, relation, to) in edges {
        graph.record(&from, relation, &to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{scan_file, SourceFile};
    use crate::config::Heuristics;

    fn classified(src: &str) -> TypeGraph {
        let file = SourceFile::new("Test.java", src.to_string());
        let mut graph = TypeGraph::new(scan_file(&file, &Heuristics::default()));
        crate::detect::classify_fields(&mut graph, &Heuristics::default());
        classify_usages(&mut graph);
        graph
    }

    #[test]
    fn test_accessor_call_shapes() {
        let text = "Logger.getInstance(); Config . get (); Logger.log(); a.Logger.instance();";
        assert!(is_accessor_call_at(text, 0, "Logger"));
        assert!(is_accessor_call_at(text, text.find("Config").unwrap(), "Config"));
        assert!(!is_accessor_call_at(text, text.find("Logger.log").unwrap(), "Logger"));
        assert!(!is_accessor_call_at(text, text.rfind("Logger").unwrap(), "Logger"));
    }

    #[test]
    fn test_singleton_usage_is_association() {
        let graph = classified(
            "class Service { void run() { Logger.getInstance().log(); } }\n\
             class Logger { private static Logger instance; public static Logger getInstance() { return instance; } }",
        );
        let service = &graph.entry("Service").unwrap().relations;
        assert!(service.associations.contains("Logger"));
        assert!(service.dependencies.is_empty());
    }

    #[test]
    fn test_singleton_usage_beats_local_variable() {
        let graph = classified(
            "class Service { void run() { Logger log = Logger.getInstance(); } }\n\
             class Logger {}",
        );
        let service = &graph.entry("Service").unwrap().relations;
        assert!(service.associations.contains("Logger"));
        assert!(!service.dependencies.contains("Logger"));
    }

    #[test]
    fn test_transient_usages_are_dependencies() {
        let graph = classified(
            "class Printer {\n\
               void print(Page page) {}\n\
               Report build() { return null; }\n\
               void run() { Clock c = now(); List<Job> jobs = load(); }\n\
             }\n\
             class Page {} class Report {} class Clock {} class Job {} class Unused {}",
        );
        let printer = &graph.entry("Printer").unwrap().relations;
        let deps: Vec<_> = printer.dependencies.iter().map(String::as_str).collect();
        assert_eq!(deps, vec!["Clock", "Job", "Page", "Report"]);
    }

    #[test]
    fn test_field_relation_blocks_dependency() {
        let graph = classified(
            "class Car { private Engine engine = new Engine(); void swap(Engine e) {} }\n\
             class Engine {}",
        );
        let car = &graph.entry("Car").unwrap().relations;
        assert!(car.compositions.contains("Engine"));
        assert!(car.dependencies.is_empty());
    }
}
