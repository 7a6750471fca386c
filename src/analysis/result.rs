//! The immutable outcome of one analysis run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::detect::{CouplingCounters, RelationshipSet};
use crate::metrics::{DerivedMetrics, FileMetrics};

use super::TypeKind;

/// Everything known about one declared type after analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    pub kind: TypeKind,
    /// File of the declaration that represents the type.
    pub file: String,
    pub relations: RelationshipSet,
    pub coupling: CouplingCounters,
    pub metrics: DerivedMetrics,
}

/// A file that was listed but could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of analyzing a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    /// File path -> size and complexity, for every loaded file.
    pub files: BTreeMap<String, FileMetrics>,
    /// Declared type name -> report.
    pub types: BTreeMap<String, TypeReport>,
    /// Share of abstract types across the whole set.
    pub abstractness: f64,
    /// Every path supplied to the analyzer, in the order given.
    pub file_paths: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl AnalysisResult {
    /// An empty result for the given input paths.
    pub fn empty(file_paths: Vec<String>) -> Self {
        Self {
            file_paths,
            ..Default::default()
        }
    }

    /// Whether any type declaration was found.
    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Mean distance from the main sequence, if any type was found.
    pub fn mean_distance(&self) -> Option<f64> {
        if self.types.is_empty() {
            return None;
        }
        let sum: f64 = self.types.values().map(|t| t.metrics.distance).sum();
        Some(sum / self.types.len() as f64)
    }

    /// Types whose distance is above `threshold`, sorted by name.
    pub fn types_over_distance(&self, threshold: f64) -> Vec<(&str, &TypeReport)> {
        self.types
            .iter()
            .filter(|(_, t)| t.metrics.distance > threshold)
            .map(|(name, t)| (name.as_str(), t))
            .collect()
    }

    /// Count of each type kind: (classes, abstract classes, interfaces).
    pub fn kind_counts(&self) -> (usize, usize, usize) {
        self.types
            .values()
            .fold((0, 0, 0), |(c, a, i), t| match t.kind {
                TypeKind::Class => (c + 1, a, i),
                TypeKind::AbstractClass => (c, a + 1, i),
                TypeKind::Interface => (c, a, i + 1),
            })
    }

    /// Total size and complexity over all loaded files.
    pub fn file_totals(&self) -> FileMetrics {
        self.files.values().fold(FileMetrics::default(), |acc, m| FileMetrics {
            size: acc.size + m.size,
            complexity: acc.complexity + m.complexity,
        })
    }
}
