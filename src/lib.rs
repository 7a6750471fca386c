//! Archlens - architecture metrics for Java-like source trees.
//!
//! Archlens extracts class and interface declarations from source text
//! without a compiler, classifies the relationships between them and
//! computes the package-design metrics of Robert C. Martin: afferent and
//! efferent coupling, instability, abstractness and distance from the
//! main sequence. Results can be rendered as a PlantUML class diagram.
//!
//! # Architecture
//!
//! - `analysis`: Sanitizing, brace matching, type extraction and the
//!   [`Analyzer`] pipeline driver
//! - `detect`: Relationship passes (signatures, bodies, fields, usages,
//!   singletons) over a shared type graph
//! - `metrics`: Coupling-derived metrics and per-file size/complexity
//! - `diagram`: External type synthesis and PlantUML rendering
//! - `config`: YAML project configuration
//! - `report`: Output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```
//! use archlens::{analyze, render, LoadError};
//!
//! let loader = |path: &str| -> Result<String, LoadError> {
//!     match path {
//!         "A.java" => Ok("abstract class A {}".to_string()),
//!         "B.java" => Ok("class B extends A {}".to_string()),
//!         _ => Err(LoadError::Unavailable(path.to_string())),
//!     }
//! };
//! let result = analyze(&["A.java", "B.java"], &loader).unwrap();
//! assert_eq!(result.abstractness, 0.5);
//! assert!(render(&result).contains("B --|> A"));
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod diagram;
pub mod metrics;
pub mod report;

pub use analysis::{
    analyze, AnalysisError, AnalysisResult, Analyzer, ContentLoader, FsLoader, LoadError,
    SourceFile, TypeDeclaration, TypeKind, TypeReport,
};
pub use config::{Config, DiagramConfig, Heuristics};
pub use detect::{CouplingCounters, Relation, RelationshipSet, Runner, TypeGraph};
pub use diagram::{render, render_with};
pub use metrics::{DerivedMetrics, FileMetrics};
