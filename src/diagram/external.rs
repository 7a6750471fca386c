//! Placeholder nodes for referenced but undeclared types.

use std::collections::BTreeMap;

use crate::analysis::{AnalysisResult, TypeKind};
use crate::detect::Relation;

/// Every relationship target that is not a declared type, with the kind
/// its placeholder node gets: interface when it was ever implemented,
/// class otherwise.
///
/// Reads the result only; coupling and metrics are untouched.
pub fn external_types(result: &AnalysisResult) -> BTreeMap<String, TypeKind> {
    let mut external: BTreeMap<String, TypeKind> = BTreeMap::new();
    for report in result.types.values() {
        for (relation, target) in report.relations.iter() {
            if result.is_declared(target) {
                continue;
            }
            let kind = external.entry(target.to_string()).or_insert(TypeKind::Class);
            if relation == Relation::Implements {
                *kind = TypeKind::Interface;
            }
        }
    }
    external
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::analysis::LoadError;

    #[test]
    fn test_external_kinds() {
        let src = "class A extends Base implements Runnable { Helper h; }\n\
                   class B implements Base {}";
        let loader = |_: &str| -> Result<String, LoadError> { Ok(src.to_string()) };
        let result = analyze(&["All.java"], &loader).unwrap();
        let before = result.types["A"].coupling;

        let external = external_types(&result);
        assert_eq!(external.get("Runnable"), Some(&TypeKind::Interface));
        // Implemented by B even though A extends it.
        assert_eq!(external.get("Base"), Some(&TypeKind::Interface));
        assert!(!external.contains_key("Helper"));
        assert!(!external.contains_key("A"));
        assert_eq!(result.types["A"].coupling, before);
    }
}
