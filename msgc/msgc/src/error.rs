//! Per-unit failures collected by [`Compiler::compile`](crate::Compiler::compile).

use msgc_core::{CompileError, TypeRef};

/// A type that failed to compile. Other units are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to compile '{type_ref}': {source}")]
pub struct UnitError {
    pub type_ref: TypeRef,
    #[source]
    pub source: CompileError,
}

impl UnitError {
    pub fn new(type_ref: TypeRef, source: impl Into<CompileError>) -> Self {
        Self {
            type_ref,
            source: source.into(),
        }
    }
}
