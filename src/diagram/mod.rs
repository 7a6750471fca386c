//! Diagram output for analysis results.

mod external;
mod plantuml;

pub use external::external_types;
pub use plantuml::{arrow, render, render_with, Stereotype};
