//! PlantUML class diagram output.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::analysis::{AnalysisResult, TypeKind};
use crate::config::DiagramConfig;
use crate::detect::{Relation, RelationshipSet};

use super::external::external_types;

/// Visual stereotype of a node. Singleton takes precedence over the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereotype {
    Singleton,
    Interface,
    Abstract,
    Concrete,
}

impl Stereotype {
    pub fn of(kind: TypeKind, singleton: bool) -> Self {
        if singleton {
            return Stereotype::Singleton;
        }
        match kind {
            TypeKind::Interface => Stereotype::Interface,
            TypeKind::AbstractClass => Stereotype::Abstract,
            TypeKind::Class => Stereotype::Concrete,
        }
    }

    /// PlantUML declaration keyword and spot annotation.
    fn parts(&self) -> (&'static str, &'static str) {
        match self {
            Stereotype::Singleton => ("class", "<< (S,#FF7700) singleton >>"),
            Stereotype::Interface => ("interface", "<< (I,#87CEEB) >>"),
            Stereotype::Abstract => ("abstract class", "<< (A,#FFD700) >>"),
            Stereotype::Concrete => ("class", "<< (C,#90EE90) >>"),
        }
    }
}

/// PlantUML arrow for a relation, drawn from the owner to the target.
pub fn arrow(relation: Relation) -> &'static str {
    match relation {
        Relation::Extends => "--|>",
        Relation::Implements => "..|>",
        Relation::Composition => "*--",
        Relation::Aggregation => "o--",
        Relation::Association => "--",
        Relation::Dependency => "..>",
    }
}

/// Render with the default diagram options.
pub fn render(result: &AnalysisResult) -> String {
    render_with(result, &DiagramConfig::default())
}

/// Render the result as PlantUML text.
///
/// Nodes and edges are sorted by name. A result without types produces
/// only the header and footer.
pub fn render_with(result: &AnalysisResult, options: &DiagramConfig) -> String {
    let external = if options.include_external {
        external_types(result)
    } else {
        BTreeMap::new()
    };

    let mut nodes: BTreeMap<&str, Stereotype> = result
        .types
        .iter()
        .map(|(name, t)| (name.as_str(), Stereotype::of(t.kind, t.relations.singleton)))
        .collect();
    for (name, kind) in &external {
        nodes.insert(name.as_str(), Stereotype::of(*kind, false));
    }

    let mut output = String::new();
    output.push_str("@startuml\n");
    if let Some(layout) = &options.layout {
        let _ = writeln!(output, "!pragma layout {}", layout);
    }
    output.push_str("hide empty members\n\n");

    for (name, stereotype) in &nodes {
        let (keyword, spot) = stereotype.parts();
        let _ = writeln!(output, "{} {} {} {{\n}}", keyword, name, spot);
    }

    output.push('\n');

    for (name, t) in &result.types {
        write_edges(&mut output, name, &t.relations, |target| nodes.contains_key(target));
    }

    output.push_str("\n@enduml");
    output
}

fn write_edges<F>(output: &mut String, name: &str, relations: &RelationshipSet, has_node: F)
where
    F: Fn(&str) -> bool,
{
    for (relation, target) in relations.iter() {
        if !has_node(target) {
            continue;
        }
        // A dependency is only drawn when nothing stronger links the pair.
        if relation == Relation::Dependency && relations.has_stronger_than_dependency(target) {
            continue;
        }
        let _ = writeln!(output, "{} {} {}", name, arrow(relation), target);
    }
    if relations.singleton {
        let _ = writeln!(output, "{} o-- {} : -instance", name, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TypeReport;
    use crate::detect::CouplingCounters;
    use crate::metrics::DerivedMetrics;

    fn report(kind: TypeKind, relations: RelationshipSet) -> TypeReport {
        TypeReport {
            kind,
            file: "X.java".to_string(),
            relations,
            coupling: CouplingCounters::default(),
            metrics: DerivedMetrics {
                abstractness: 0.0,
                instability: 0.0,
                distance: 0.0,
            },
        }
    }

    #[test]
    fn test_empty_result_has_header_and_footer_only() {
        let out = render(&AnalysisResult::default());
        assert_eq!(
            out,
            "@startuml\n!pragma layout smetana\nhide empty members\n\n\n\n@enduml"
        );
    }

    #[test]
    fn test_stereotype_precedence() {
        assert_eq!(Stereotype::of(TypeKind::Interface, true), Stereotype::Singleton);
        assert_eq!(Stereotype::of(TypeKind::AbstractClass, false), Stereotype::Abstract);
        assert_eq!(Stereotype::of(TypeKind::Class, false), Stereotype::Concrete);
    }

    #[test]
    fn test_nodes_and_edges() {
        let mut result = AnalysisResult::default();
        let mut car = RelationshipSet::default();
        car.record(Relation::Extends, "Vehicle");
        car.record(Relation::Implements, "Drivable");
        car.record(Relation::Composition, "Engine");
        car.record(Relation::Dependency, "Road");
        result.types.insert("Car".into(), report(TypeKind::Class, car));
        result.types.insert("Vehicle".into(), report(TypeKind::AbstractClass, RelationshipSet::default()));
        result.types.insert("Engine".into(), report(TypeKind::Class, RelationshipSet::default()));
        let mut logger = RelationshipSet::default();
        logger.singleton = true;
        result.types.insert("Logger".into(), report(TypeKind::Class, logger));

        let out = render(&result);
        assert!(out.contains("class Car << (C,#90EE90) >> {\n}\n"));
        assert!(out.contains("abstract class Vehicle << (A,#FFD700) >> {\n}\n"));
        assert!(out.contains("interface Drivable << (I,#87CEEB) >> {\n}\n"));
        assert!(out.contains("class Road << (C,#90EE90) >> {\n}\n"));
        assert!(out.contains("class Logger << (S,#FF7700) singleton >> {\n}\n"));
        assert!(out.contains("Car --|> Vehicle\n"));
        assert!(out.contains("Car ..|> Drivable\n"));
        assert!(out.contains("Car *-- Engine\n"));
        assert!(out.contains("Car ..> Road\n"));
        assert!(out.contains("Logger o-- Logger : -instance\n"));
        assert!(out.ends_with("\n@enduml"));
    }

    #[test]
    fn test_dependency_hidden_when_stronger_relation_exists() {
        let mut result = AnalysisResult::default();
        // Bypass `record` to build a set holding both relations for a pair.
        let mut a = RelationshipSet::default();
        a.associations.insert("B".to_string());
        a.dependencies.insert("B".to_string());
        result.types.insert("A".into(), report(TypeKind::Class, a));
        result.types.insert("B".into(), report(TypeKind::Class, RelationshipSet::default()));

        let out = render(&result);
        assert!(out.contains("A -- B\n"));
        assert!(!out.contains("A ..> B"));
    }

    #[test]
    fn test_options() {
        let mut result = AnalysisResult::default();
        let mut a = RelationshipSet::default();
        a.record(Relation::Implements, "Runnable");
        result.types.insert("A".into(), report(TypeKind::Class, a));

        let options = DiagramConfig {
            layout: None,
            include_external: false,
        };
        let out = render_with(&result, &options);
        assert!(!out.contains("!pragma"));
        assert!(!out.contains("Runnable"));
        assert!(out.contains("class A "));
    }
}
