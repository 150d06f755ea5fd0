//! ROS1 message-definition compiler.
//!
//! ```text
//! .msg / .srv text ──► parser ──► TypeTable ──► resolver ──┬─► md5sum + definition
//!                                     ▲                     └─► serialization plan
//!                          DefinitionSource                            │
//!                                                                       ▼
//!                                                              encode / decode
//! ```
//!
//! [`Compiler::compile`] runs the whole pipeline over a batch of
//! [`SourceUnit`]s and returns a [`CompileReport`]. The stage crates are
//! re-exported for callers that need a single step.

mod compiled;
mod compiler;
mod error;
mod unit;

pub use compiled::{CompiledMessage, CompiledService};
pub use compiler::{CompileReport, Compiler, CompilerBuilder};
pub use error::UnitError;
pub use msgc_codec as codec;
pub use msgc_core as core;
pub use msgc_hash as hash;
pub use msgc_parser as parser;
pub use msgc_plan as plan;
pub use msgc_resolver as resolver;
pub use unit::{SourceUnit, UnitKind};
