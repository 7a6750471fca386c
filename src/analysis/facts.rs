//! Fact structures extracted from source text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize;

/// Byte span of a type body: the offsets of its `{` and matching `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the opening brace.
    pub open: usize,
    /// Offset of the closing brace (inclusive).
    pub close: usize,
}

impl Span {
    /// Check whether `other` lies strictly inside this span.
    pub fn strictly_contains(&self, other: &Span) -> bool {
        other.open > self.open && other.close < self.close
    }
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::AbstractClass => "abstract_class",
            TypeKind::Interface => "interface",
        }
    }

    /// Abstract classes and interfaces count toward abstractness.
    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeKind::AbstractClass | TypeKind::Interface)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A loaded source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path as supplied by the content loader.
    pub name: String,
    /// Raw text, untouched.
    pub raw: String,
    /// Sanitized copy with the same byte offsets as `raw`.
    pub sanitized: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, raw: String) -> Self {
        let sanitized = sanitize(&raw);
        Self {
            name: name.into(),
            raw,
            sanitized,
        }
    }
}

/// A type declaration found in a source file.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    /// Simple type name.
    pub name: String,
    /// Raw text between the name and the opening brace.
    pub heritage: String,
    pub kind: TypeKind,
    /// Body span within the owning file.
    pub span: Span,
    /// Name of the owning file.
    pub file: String,
    /// Sanitized body text, braces included.
    pub body: String,
    /// Sanitized body with nested type declarations blanked out.
    pub denested_body: String,
}

impl TypeDeclaration {
    /// Byte offset in the owning file of the first byte of `body`.
    pub fn body_offset(&self) -> usize {
        self.span.open
    }
}
