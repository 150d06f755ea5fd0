//! Per-type serialization plans.

use msgc_core::{Arity, Field, FieldType, PrimitiveType, TypeRef};

/// How a field is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Scalar non-string primitive, written at its fixed width.
    FixedWidth,
    /// Scalar string: u32 byte length, then the bytes.
    LengthPrefixedString,
    /// `N` elements back to back, no prefix.
    FixedArray(usize),
    /// u32 element count, then the elements.
    LengthPrefixedArray,
    /// Scalar nested message, inlined.
    Nested,
}

/// Type of a single element of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Primitive(PrimitiveType),
    Nested(TypeRef),
}

impl From<&FieldType> for Element {
    fn from(ty: &FieldType) -> Self {
        match ty {
            FieldType::Primitive(p) => Self::Primitive(*p),
            FieldType::Nested(r) => Self::Nested(r.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub field: Field,
    pub strategy: Strategy,
    pub element: Element,
    /// Encoded size of one element, when every element has the same size.
    pub element_size: Option<usize>,
    /// Width of a fixed-width primitive element.
    pub primitive_width: Option<usize>,
}

impl FieldPlan {
    /// Encoded size of the whole field, when it never varies.
    pub fn fixed_size(&self) -> Option<usize> {
        let element = self.element_size?;
        match self.strategy {
            Strategy::FixedWidth | Strategy::Nested => Some(element),
            Strategy::FixedArray(n) => element.checked_mul(n),
            Strategy::LengthPrefixedString | Strategy::LengthPrefixedArray => None,
        }
    }
}

/// Wire layout of one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationPlan {
    pub type_ref: TypeRef,
    /// In declaration order, which is wire order.
    pub field_plans: Vec<FieldPlan>,
    /// No string and no dynamic array anywhere in the type, nested types included.
    pub is_fixed_size: bool,
    /// Exact encoded size, set iff [`Self::is_fixed_size`].
    pub fixed_size_bytes: Option<usize>,
    /// Field 0 is a scalar of the configured header type.
    pub has_header: bool,
}

impl SerializationPlan {
    /// Plan `type_ref` from its fields. `nested_size` gives the fixed size of
    /// an already planned nested type, or `None` when it is variable.
    pub(crate) fn new(
        type_ref: TypeRef,
        fields: &[Field],
        header_type: &TypeRef,
        nested_size: impl Fn(&TypeRef) -> Option<usize>,
    ) -> Self {
        let field_plans: Vec<FieldPlan> = fields
            .iter()
            .map(|f| plan_field(f, &nested_size))
            .collect();

        let fixed_size_bytes = field_plans
            .iter()
            .try_fold(0usize, |acc, p| acc.checked_add(p.fixed_size()?));

        let has_header = fields.first().is_some_and(|f| {
            f.arity == Arity::Scalar && f.ty.as_nested().is_some_and(|r| r == header_type)
        });

        Self {
            type_ref,
            field_plans,
            is_fixed_size: fixed_size_bytes.is_some(),
            fixed_size_bytes,
            has_header,
        }
    }
}

fn plan_field(field: &Field, nested_size: &impl Fn(&TypeRef) -> Option<usize>) -> FieldPlan {
    let element = Element::from(&field.ty);
    let primitive_width = match &element {
        Element::Primitive(p) => p.fixed_width(),
        Element::Nested(_) => None,
    };
    let element_size = match &element {
        Element::Primitive(_) => primitive_width,
        Element::Nested(r) => nested_size(r),
    };
    let strategy = match (field.arity, &element) {
        (Arity::FixedArray(n), _) => Strategy::FixedArray(n),
        (Arity::DynamicArray, _) => Strategy::LengthPrefixedArray,
        (Arity::Scalar, Element::Nested(_)) => Strategy::Nested,
        (Arity::Scalar, Element::Primitive(PrimitiveType::String)) => {
            Strategy::LengthPrefixedString
        }
        (Arity::Scalar, Element::Primitive(_)) => Strategy::FixedWidth,
    };
    FieldPlan {
        field: field.clone(),
        strategy,
        element,
        element_size,
        primitive_width,
    }
}
