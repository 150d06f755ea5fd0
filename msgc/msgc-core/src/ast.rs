//! Declaration types produced by the parser and consumed by every later stage.
//!
//! A [`Declaration`] is the in-memory form of one `.msg` unit. Field order is
//! significant: it fixes the wire order and participates in the md5sum, so two
//! declarations with the same fields in a different order are different types.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::ConfigError;

/// Builtin ROS1 field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    /// Deprecated alias of `int8`; kept distinct because the md5 text keeps the spelling.
    Byte,
    /// Deprecated alias of `uint8`; kept distinct for the same reason as [`PrimitiveType::Byte`].
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Length-prefixed byte string.
    String,
    /// `{secs: u32, nsecs: u32}`.
    Time,
    /// `{secs: i32, nsecs: i32}`.
    Duration,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 16] = [
        PrimitiveType::Bool,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::I8,
        PrimitiveType::U8,
        PrimitiveType::I16,
        PrimitiveType::U16,
        PrimitiveType::I32,
        PrimitiveType::U32,
        PrimitiveType::I64,
        PrimitiveType::U64,
        PrimitiveType::F32,
        PrimitiveType::F64,
        PrimitiveType::String,
        PrimitiveType::Time,
        PrimitiveType::Duration,
    ];

    /// The lower-case type name used in `.msg` files and in the md5 text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::I8 => "int8",
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::U16 => "uint16",
            Self::I32 => "int32",
            Self::U32 => "uint32",
            Self::I64 => "int64",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::String => "string",
            Self::Time => "time",
            Self::Duration => "duration",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Encoded width in bytes, or `None` for `string`.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Byte | Self::Char | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 | Self::Time | Self::Duration => Some(8),
            Self::String => None,
        }
    }

    /// Whether a constant may be declared with this type.
    pub fn is_constant_type(&self) -> bool {
        !matches!(self, Self::Time | Self::Duration)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-qualified message type name, `package/Name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct TypeRef {
    pub package: String,
    pub name: String,
}

impl TypeRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.name)
    }
}

impl FromStr for TypeRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [package, name] if is_identifier(package) && is_identifier(name) => {
                Ok(Self::new(*package, *name))
            }
            _ => Err(ConfigError::InvalidTypeName(s.to_string())),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `[A-Za-z][A-Za-z0-9_]*`, the legal form of package, type, field and constant names.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Element type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Primitive(PrimitiveType),
    Nested(TypeRef),
}

impl FieldType {
    pub fn as_nested(&self) -> Option<&TypeRef> {
        match self {
            Self::Nested(r) => Some(r),
            Self::Primitive(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => p.fmt(f),
            Self::Nested(r) => r.fmt(f),
        }
    }
}

/// How many values of the element type a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Scalar,
    /// `T[N]`, N > 0. Encoded without a length prefix.
    FixedArray(usize),
    /// `T[]`. Encoded with a u32 count prefix.
    DynamicArray,
}

impl Arity {
    /// The normalized array suffix: `""`, `"[N]"` or `"[]"`.
    pub fn suffix(&self) -> String {
        match self {
            Self::Scalar => String::new(),
            Self::FixedArray(n) => format!("[{n}]"),
            Self::DynamicArray => "[]".to_string(),
        }
    }
}

/// A single field of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub arity: Arity,
    /// `true` when the source spelled a nested type without a package and the
    /// declaring package was filled in.
    pub implicit_package: bool,
    /// Inline comment text after the `#`, verbatim.
    pub comment: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType, arity: Arity) -> Self {
        Self {
            name: name.into(),
            ty,
            arity,
            implicit_package: false,
            comment: None,
        }
    }
}

/// A constant declaration (`int32 MAX=10`). Does not affect the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub ty: PrimitiveType,
    /// Literal text as used in the md5 text.
    pub value: String,
    pub comment: Option<String>,
}

/// One parsed message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub type_ref: TypeRef,
    pub fields: Vec<Field>,
    pub constants: Vec<Constant>,
    /// Full-line comments in source order, without the `#`.
    pub comments: Vec<String>,
    /// Verbatim unit text, used for the expanded full definition.
    pub source: String,
}

impl Declaration {
    /// Nested type references in first-appearance order, each listed once.
    pub fn nested_refs(&self) -> Vec<&TypeRef> {
        let mut out: Vec<&TypeRef> = Vec::new();
        for r in self.fields.iter().filter_map(|f| f.ty.as_nested()) {
            if !out.contains(&r) {
                out.push(r);
            }
        }
        out
    }
}

/// A `.srv` definition: a request and a response declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeclaration {
    pub type_ref: TypeRef,
    /// Named `<Name>Request`.
    pub request: Declaration,
    /// Named `<Name>Response`.
    pub response: Declaration,
}
