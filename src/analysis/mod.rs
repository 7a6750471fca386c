//! Lexical analysis of Java-like sources.
//!
//! Every stage works on a sanitized copy of the file in which string
//! literals, char literals and comments are blanked without moving any
//! byte. Declarations are then found with bounded forward scans and brace
//! matching instead of a grammar.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐    ┌────────────┐    ┌────────────────┐    ┌────────────┐
//! │ ContentLoader│───▶│ SourceFile │───▶│ extract_types  │───▶│ TypeGraph  │
//! │ (paths)      │    │ (sanitize) │    │ + erase_nested │    │ (detect::) │
//! └──────────────┘    └────────────┘    └────────────────┘    └────────────┘
//!                                                                   │
//!                                                                   ▼
//!                                                            ┌──────────────┐
//!                                                            │AnalysisResult│
//!                                                            │  (metrics)   │
//!                                                            └──────────────┘
//! ```
//!
//! [`Analyzer`] drives the whole pipeline; [`analyze`] is the shortcut with
//! default settings.

mod analyzer;
pub mod braces;
mod extract;
mod facts;
mod loader;
mod result;
pub mod sanitize;
pub mod tokens;

pub use analyzer::{analyze, AnalysisError, Analyzer};
pub use extract::{erase_nested, extract_types, scan_file};
pub use facts::{SourceFile, Span, TypeDeclaration, TypeKind};
pub use loader::{ContentLoader, FsLoader, LoadError};
pub use result::{AnalysisResult, SkippedFile, TypeReport};
pub use sanitize::sanitize;
