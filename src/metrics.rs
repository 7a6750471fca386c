//! Architectural and file-level metrics.
//!
//! Type metrics follow the main-sequence model: abstractness `A` is a ratio
//! over the whole analyzed set, instability `I` comes from each type's
//! coupling counts, and distance `D = |A + I - 1|` measures how far a type
//! sits from the ideal line.

use serde::{Deserialize, Serialize};

use crate::analysis::sanitize::{non_empty_lines, sanitize};
use crate::analysis::tokens::count_word;
use crate::analysis::TypeKind;
use crate::detect::CouplingCounters;

/// Keywords counted toward a file's complexity.
pub const CONTROL_KEYWORDS: &[&str] = &["if", "switch", "for", "while"];

/// Metrics derived for a single declared type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// 1.0 for interfaces and abstract classes, 0.0 otherwise.
    pub abstractness: f64,
    /// Ce / (Ca + Ce), or 0 without any coupling.
    pub instability: f64,
    /// |A_global + I - 1|
    pub distance: f64,
}

/// Ratio of abstract types (interfaces and abstract classes) to all types.
/// An empty set has abstractness 0.
pub fn abstractness_ratio<I>(kinds: I) -> f64
where
    I: IntoIterator<Item = TypeKind>,
{
    let (abstract_count, total) = kinds
        .into_iter()
        .fold((0usize, 0usize), |(a, t), kind| {
            (a + usize::from(kind.is_abstract()), t + 1)
        });
    if total == 0 {
        0.0
    } else {
        abstract_count as f64 / total as f64
    }
}

pub fn instability(coupling: &CouplingCounters) -> f64 {
    let total = coupling.total();
    if total == 0 {
        0.0
    } else {
        coupling.efferent as f64 / total as f64
    }
}

pub fn distance(global_abstractness: f64, instability: f64) -> f64 {
    (global_abstractness + instability - 1.0).abs()
}

/// Compute the metrics of one type against the set-wide abstractness.
pub fn derive(
    kind: TypeKind,
    coupling: &CouplingCounters,
    global_abstractness: f64,
) -> DerivedMetrics {
    let i = instability(coupling);
    DerivedMetrics {
        abstractness: if kind.is_abstract() { 1.0 } else { 0.0 },
        instability: i,
        distance: distance(global_abstractness, i),
    }
}

/// Size and control-flow counts for a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Non-empty line count.
    pub size: usize,
    /// Whole-word occurrences of the control keywords outside strings and
    /// comments.
    pub complexity: usize,
}

impl FileMetrics {
    pub fn measure(raw: &str) -> Self {
        Self::measure_sanitized(raw, &sanitize(raw))
    }

    /// Measure with an already sanitized copy of `raw`.
    pub fn measure_sanitized(raw: &str, sanitized: &str) -> Self {
        Self {
            size: non_empty_lines(raw),
            complexity: CONTROL_KEYWORDS
                .iter()
                .map(|kw| count_word(sanitized, kw))
                .sum(),
        }
    }
}
