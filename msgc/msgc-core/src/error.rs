//! Error taxonomy shared by the compiler stages and the codec runtime.

use crate::ast::TypeRef;

/// Failure to turn one source unit into a declaration. Fatal to that unit only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A line is malformed.
    #[error("syntax error in '{unit}' at line {line} near `{token}`: {detail}")]
    Syntax {
        unit: String,
        line: usize,
        token: String,
        detail: String,
    },

    /// A line is well-formed but meaningless (duplicate name, bad constant type or value).
    #[error("semantic error in '{unit}' at line {line}: {detail}")]
    Semantic {
        unit: String,
        line: usize,
        detail: String,
    },
}

/// Failure to resolve the type references of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No declaration matches a reference.
    #[error("unresolved type '{reference}' (via {})", format_chain(.chain))]
    UnresolvedType {
        reference: TypeRef,
        /// Root first, referencing type last.
        chain: Vec<TypeRef>,
    },

    /// A package-less reference matched several declarations on the search path.
    #[error(
        "ambiguous type '{name}' (via {}): candidates {}",
        format_chain(.chain),
        format_chain(.candidates)
    )]
    AmbiguousType {
        name: String,
        candidates: Vec<TypeRef>,
        chain: Vec<TypeRef>,
    },

    /// A type depends on itself. The first member is repeated at the end.
    #[error("cyclic dependency: {}", format_chain(.cycle))]
    CyclicDependency { cycle: Vec<TypeRef> },

    /// A referenced type exists but its own compilation failed.
    #[error("dependency '{reference}' failed to compile (via {})", format_chain(.chain))]
    DependencyFailed {
        reference: TypeRef,
        chain: Vec<TypeRef>,
    },

    /// Two units declare the same type.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(TypeRef),

    /// The requested root is not in the type table.
    #[error("unknown root type '{0}'")]
    UnknownRoot(TypeRef),
}

fn format_chain(chain: &[TypeRef]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Any failure that prevents a unit from compiling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Runtime failure of one encode or decode call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer is truncated or malformed.
    #[error("decode error at '{field}' (offset {offset}): {detail}")]
    Decode {
        field: String,
        offset: usize,
        detail: String,
    },

    /// The value does not match its declaration.
    #[error("encoding error at '{field}' (offset {offset}): {detail}")]
    Encoding {
        field: String,
        offset: usize,
        detail: String,
    },

    /// The plan table has no plan for a type.
    #[error("no serialization plan for '{0}'")]
    MissingPlan(TypeRef),
}

/// Invalid configuration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid type name '{0}', expected `package/Name`")]
    InvalidTypeName(String),

    #[error("invalid configuration: {0}")]
    Toml(String),
}
