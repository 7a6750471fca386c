//! Inheritance and realization edges from heritage clauses.

use crate::analysis::tokens::Cursor;

use super::{Relation, TypeGraph};

/// Targets named in a heritage clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heritage {
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

/// Parse the text between a type's name and its opening brace.
///
/// Only the first `extends` target is kept. Type parameters and generic
/// arguments are skipped, and qualified names keep their last segment.
/// An interface's `extends A, B` list yields `A` only.
pub fn parse_heritage(clause: &str) -> Heritage {
    let mut heritage = Heritage::default();
    let mut cursor = Cursor::new(clause, 0);
    cursor.skip_ws();
    cursor.skip_angles();

    while !cursor.is_eof() {
        cursor.skip_ws();
        if cursor.eat_word("extends") {
            cursor.skip_ws();
            let targets = comma_list(&mut cursor);
            if heritage.extends.is_none() {
                heritage.extends = targets.into_iter().next();
            }
        } else if cursor.eat_word("implements") {
            cursor.skip_ws();
            heritage.implements.extend(comma_list(&mut cursor));
        } else if cursor.ident().is_none() {
            cursor.bump();
        }
    }

    heritage
}

/// Read `Name<..>, pkg.Name, ...` starting at the cursor.
fn comma_list(cursor: &mut Cursor<'_>) -> Vec<String> {
    let mut names = Vec::new();
    loop {
        cursor.skip_ws();
        let Some(name) = cursor.qualified_ident() else {
            break;
        };
        if name == "extends" || name == "implements" {
            break;
        }
        names.push(name.to_string());
        cursor.skip_ws();
        cursor.skip_angles();
        cursor.skip_ws();
        if !cursor.eat(b',') {
            break;
        }
    }
    names
}

/// Record extends/implements relationships for every declaration occurrence
/// and count coupling to declared targets.
pub fn resolve_signatures(graph: &mut TypeGraph) {
    let edges: Vec<(String, Relation, String)> = graph
        .declarations()
        .iter()
        .flat_map(|decl| {
            let heritage = parse_heritage(&decl.heritage);
            let name = decl.name.clone();
            heritage
                .extends
                .into_iter()
                .map(|t| (Relation::Extends, t))
                .chain(heritage.implements.into_iter().map(|t| (Relation::Implements, t)))
                .map(move |(rel, target)| (name.clone(), rel, target))
        })
        .collect();

    for (from, relation, to) in edges {
        if from == to {
            continue;
        }
        graph.record(&from, relation, &to);
        graph.couple(&from, &to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{scan_file, SourceFile};
    use crate::config::Heuristics;

    fn graph_of(src: &str) -> TypeGraph {
        let file = SourceFile::new("Test.java", src.to_string());
        TypeGraph::new(scan_file(&file, &Heuristics::default()))
    }

    #[test]
    fn test_parse_heritage() {
        let h = parse_heritage("extends Base implements Runnable, java.io.Serializable");
        assert_eq!(h.extends.as_deref(), Some("Base"));
        assert_eq!(h.implements, vec!["Runnable", "Serializable"]);

        let h = parse_heritage("<T extends Comparable<T>> extends Box<T> implements Sink<T>");
        assert_eq!(h.extends.as_deref(), Some("Box"));
        assert_eq!(h.implements, vec!["Sink"]);

        let h = parse_heritage("extends A, B");
        assert_eq!(h.extends.as_deref(), Some("A"));
        assert!(h.implements.is_empty());

        assert_eq!(parse_heritage(""), Heritage::default());
    }

    #[test]
    fn test_extends_couples_declared_types() {
        let mut graph = graph_of("class C extends D {}\nclass D {}");
        resolve_signatures(&mut graph);

        let c = graph.entry("C").unwrap();
        let d = graph.entry("D").unwrap();
        assert!(c.relations.extends.contains("D"));
        assert_eq!(c.coupling.efferent, 1);
        assert_eq!(d.coupling.afferent, 1);
        assert_eq!(d.coupling.efferent, 0);
    }

    #[test]
    fn test_undeclared_targets_recorded_without_coupling() {
        let mut graph = graph_of("class Task implements Runnable {}");
        resolve_signatures(&mut graph);

        let task = graph.entry("Task").unwrap();
        assert!(task.relations.implements.contains("Runnable"));
        assert_eq!(task.coupling.total(), 0);
    }
}
