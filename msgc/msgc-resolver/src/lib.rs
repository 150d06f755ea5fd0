//! Dependency resolution for parsed `msgc` declarations.
//!
//! Key components:
//! - [`DefinitionSource`]: lookup collaborator for definitions not yet loaded
//! - [`TypeTable`]: all known declarations; populated once, then read-only
//! - [`Resolution`]: a root type with its resolved dependency closure
//! - [`DependencyGraph`]: direct dependencies and the deterministic
//!   depth-first dependency order

mod graph;
mod resolve;
mod source;
mod table;

pub use graph::DependencyGraph;
pub use resolve::Resolution;
pub use source::{DefinitionSource, NoSource};
pub use table::TypeTable;
