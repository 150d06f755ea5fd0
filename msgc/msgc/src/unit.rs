use msgc_core::TypeRef;

/// Kind of definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// `.msg`
    Message,
    /// `.srv`
    Service,
}

/// One definition file to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub type_ref: TypeRef,
    pub kind: UnitKind,
    pub text: String,
}

impl SourceUnit {
    pub fn message(type_ref: TypeRef, text: impl Into<String>) -> Self {
        Self {
            type_ref,
            kind: UnitKind::Message,
            text: text.into(),
        }
    }

    pub fn service(type_ref: TypeRef, text: impl Into<String>) -> Self {
        Self {
            type_ref,
            kind: UnitKind::Service,
            text: text.into(),
        }
    }
}
