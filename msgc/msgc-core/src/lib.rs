//! Core data model shared by the `msgc` pipeline stages.
//!
//! This crate has no knowledge of parsing or encoding; it provides the
//! [`Declaration`] model, the error taxonomy, the codec [`Value`] and the
//! [`CompilerConfig`].

pub mod ast;
mod config;
mod error;
mod value;

pub use ast::{
    Arity, Constant, Declaration, Field, FieldType, PrimitiveType, ServiceDeclaration, TypeRef,
    is_identifier,
};
pub use config::CompilerConfig;
pub use error::{CodecError, CompileError, ConfigError, ParseError, ResolveError};
pub use value::Value;
