//! Line-oriented `.msg` parser.
//!
//! Every non-blank, non-comment line is either a field (`<type> <name>`) or a
//! constant (`<type> <NAME>=<value>`). A line is a constant when its
//! comment-stripped text contains `=`.

use std::collections::HashSet;

use msgc_core::{
    Arity, CompilerConfig, Constant, Declaration, Field, FieldType, ParseError, PrimitiveType,
    TypeRef, is_identifier,
};

use crate::{
    grammar::{TypeToken, type_token},
    lex::split_comment,
};

/// Parse the text of one `.msg` unit declaring `type_ref`.
pub fn parse_message(
    type_ref: &TypeRef,
    text: &str,
    config: &CompilerConfig,
) -> Result<Declaration, ParseError> {
    let lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));
    parse_lines(type_ref, lines, text.to_string(), config)
}

/// Parse numbered lines into a declaration. Line numbers are used in errors,
/// so callers parsing part of a file (a `.srv` half) keep the original ones.
pub(crate) fn parse_lines<'a>(
    type_ref: &TypeRef,
    lines: impl IntoIterator<Item = (usize, &'a str)>,
    source: String,
    config: &CompilerConfig,
) -> Result<Declaration, ParseError> {
    let mut ctx = LineContext {
        type_ref,
        config,
        line_no: 0,
    };
    let mut fields = Vec::new();
    let mut constants = Vec::new();
    let mut comments = Vec::new();
    let mut names = HashSet::new();

    for (line_no, raw) in lines {
        ctx.line_no = line_no;
        let (content, comment) = split_comment(raw);
        let content = content.trim();
        if content.is_empty() {
            if let Some(comment) = comment {
                comments.push(comment.to_string());
            }
            continue;
        }

        let name = if content.contains('=') {
            let constant = ctx.parse_constant(raw, content, comment)?;
            let name = constant.name.clone();
            constants.push(constant);
            name
        } else {
            let field = ctx.parse_field(content, comment)?;
            let name = field.name.clone();
            fields.push(field);
            name
        };

        if !names.insert(name.clone()) {
            return Err(ctx.semantic(format!("duplicate name `{name}`")));
        }
    }

    Ok(Declaration {
        type_ref: type_ref.clone(),
        fields,
        constants,
        comments,
        source,
    })
}

struct LineContext<'a> {
    type_ref: &'a TypeRef,
    config: &'a CompilerConfig,
    line_no: usize,
}

impl LineContext<'_> {
    fn syntax(&self, token: &str, detail: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            unit: self.type_ref.to_string(),
            line: self.line_no,
            token: token.to_string(),
            detail: detail.into(),
        }
    }

    fn semantic(&self, detail: impl Into<String>) -> ParseError {
        ParseError::Semantic {
            unit: self.type_ref.to_string(),
            line: self.line_no,
            detail: detail.into(),
        }
    }

    fn parse_field(&self, content: &str, comment: Option<&str>) -> Result<Field, ParseError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let [ty, name] = tokens.as_slice() else {
            let offending = tokens.get(2).unwrap_or(&tokens[0]);
            return Err(self.syntax(offending, "expected `<type> <name>`"));
        };

        let token = type_token(ty).ok_or_else(|| self.syntax(ty, "malformed type"))?;
        if !is_identifier(name) {
            return Err(self.syntax(name, "malformed field name"));
        }
        let arity = self.arity(ty, &token)?;
        let (ty, implicit_package) = self.field_type(&token);

        Ok(Field {
            name: name.to_string(),
            ty,
            arity,
            implicit_package,
            comment: comment.map(ToString::to_string),
        })
    }

    fn arity(&self, raw: &str, token: &TypeToken<'_>) -> Result<Arity, ParseError> {
        match token.array {
            None => Ok(Arity::Scalar),
            Some("") => Ok(Arity::DynamicArray),
            Some(size) => match size.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Arity::FixedArray(n)),
                _ => Err(self.syntax(raw, "array size must be a positive integer")),
            },
        }
    }

    /// Map a type token to a field type. Bare names are qualified with the
    /// builtin package when reserved, otherwise with the declaring package.
    fn field_type(&self, token: &TypeToken<'_>) -> (FieldType, bool) {
        if let Some(package) = token.package {
            return (FieldType::Nested(TypeRef::new(package, token.name)), false);
        }
        if let Some(p) = PrimitiveType::from_name(token.name) {
            return (FieldType::Primitive(p), false);
        }
        if self.config.is_reserved(token.name) {
            let r = TypeRef::new(&self.config.builtin_package, token.name);
            return (FieldType::Nested(r), false);
        }
        let r = TypeRef::new(&self.type_ref.package, token.name);
        (FieldType::Nested(r), true)
    }

    fn parse_constant(
        &self,
        raw: &str,
        content: &str,
        comment: Option<&str>,
    ) -> Result<Constant, ParseError> {
        let ty_raw = content
            .split(|c: char| c.is_whitespace() || c == '=')
            .next()
            .unwrap_or_default();
        let token = type_token(ty_raw).ok_or_else(|| self.syntax(ty_raw, "malformed type"))?;
        let ty = match (token.package, PrimitiveType::from_name(token.name), token.array) {
            (None, Some(p), None) if p.is_constant_type() => p,
            _ => {
                return Err(self.semantic(format!(
                    "`{ty_raw}` is not a legal constant type, expected a primitive scalar"
                )));
            }
        };

        // String literals run to the end of the raw line; `#` does not start a comment.
        let (body, comment) = if ty == PrimitiveType::String {
            let start = raw.find(ty_raw).unwrap_or_default() + ty_raw.len();
            (&raw[start..], None)
        } else {
            (&content[ty_raw.len()..], comment)
        };
        let Some((name, value)) = body.split_once('=') else {
            return Err(self.syntax(content, "expected `<type> <NAME>=<value>`"));
        };
        let (name, value) = (name.trim(), value.trim());
        if !is_identifier(name) {
            return Err(self.syntax(name, "malformed constant name"));
        }
        if ty != PrimitiveType::String {
            self.check_literal(ty, name, value)?;
        }

        Ok(Constant {
            name: name.to_string(),
            ty,
            value: value.to_string(),
            comment: comment.map(ToString::to_string),
        })
    }

    fn check_literal(&self, ty: PrimitiveType, name: &str, value: &str) -> Result<(), ParseError> {
        let range = match ty {
            PrimitiveType::I8 | PrimitiveType::Byte => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveType::U8 | PrimitiveType::Char => Some((0, u8::MAX as i128)),
            PrimitiveType::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveType::U16 => Some((0, u16::MAX as i128)),
            PrimitiveType::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveType::U32 => Some((0, u32::MAX as i128)),
            PrimitiveType::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveType::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        };
        let valid = match (ty, range) {
            (_, Some((lo, hi))) => value.parse::<i128>().is_ok_and(|v| (lo..=hi).contains(&v)),
            (PrimitiveType::F32 | PrimitiveType::F64, None) => value.parse::<f64>().is_ok(),
            (PrimitiveType::Bool, None) => {
                matches!(value, "True" | "False" | "true" | "false" | "1" | "0")
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(self.semantic(format!(
                "invalid value `{value}` for {ty} constant `{name}`"
            )))
        }
    }
}
