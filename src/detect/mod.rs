//! Relationship detection passes over extracted declarations.

mod body;
mod fields;
mod graph;
mod methods;
mod patterns;
mod runner;
mod signature;
mod singleton;
mod types;

pub use body::resolve_bodies;
pub use fields::{classify_field, classify_fields, extract_fields, field_region, Field};
pub use graph::{TypeEntry, TypeGraph};
pub use methods::{classify_usages, is_accessor_call_at, is_transient_use};
pub use runner::Runner;
pub use signature::{parse_heritage, resolve_signatures, Heritage};
pub use singleton::{is_singleton, mark_singletons, ACCESSOR_NAMES};
pub use types::{CouplingCounters, Relation, RelationshipSet};
