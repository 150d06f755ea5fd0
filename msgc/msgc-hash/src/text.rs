//! Textual renderings of a declaration and its dependency closure.

use std::{collections::BTreeMap, fmt::Write as _};

use msgc_core::{Declaration, FieldType, ResolveError, TypeRef};
use msgc_resolver::Resolution;

use crate::digest::CanonicalDigest;

/// Line of 80 `=` that precedes every dependency block.
pub const DEPENDENCY_SEPARATOR: &str =
    "================================================================================";

/// Digests of already-hashed types, keyed by type.
pub type DigestMap = BTreeMap<TypeRef, CanonicalDigest>;

/// The text hashed into the md5sum of `decl`.
///
/// Constants first, then fields, both in declared order. Builtin fields keep
/// their array suffix; nested fields are written as the nested type's digest
/// with no suffix. Nested digests come from `digests`; a missing one is
/// reported as an unresolved reference of `decl`.
pub fn md5_text(decl: &Declaration, digests: &DigestMap) -> Result<String, ResolveError> {
    let mut text = String::new();
    for c in &decl.constants {
        let _ = writeln!(text, "{} {}={}", c.ty, c.name, c.value);
    }
    for f in &decl.fields {
        match &f.ty {
            FieldType::Primitive(p) => {
                let _ = writeln!(text, "{p}{} {}", f.arity.suffix(), f.name);
            }
            FieldType::Nested(r) => {
                let digest = digests
                    .get(r)
                    .ok_or_else(|| ResolveError::UnresolvedType {
                        reference: r.clone(),
                        chain: vec![decl.type_ref.clone()],
                    })?;
                let _ = writeln!(text, "{digest} {}", f.name);
            }
        }
    }
    text.truncate(text.trim_end().len());
    Ok(text)
}

/// Comment-free lines of `decl`: constants, then fields with nested types
/// fully qualified.
pub fn normalized_lines(decl: &Declaration) -> Vec<String> {
    let constants = decl
        .constants
        .iter()
        .map(|c| format!("{} {}={}", c.ty, c.name, c.value));
    let fields = decl
        .fields
        .iter()
        .map(|f| format!("{}{} {}", f.ty, f.arity.suffix(), f.name));
    constants.chain(fields).collect()
}

/// The root's normalized lines followed by one block per dependency in
/// dependency order, each introduced by the separator and `MSG: pkg/Name`.
pub fn canonical_text(resolution: &Resolution) -> String {
    expand(resolution, |decl| normalized_lines(decl).join("\n"))
}

/// The expanded definition sent in connection headers: like
/// [`canonical_text`] but with every unit's source text verbatim.
pub fn full_definition(resolution: &Resolution) -> String {
    expand(resolution, |decl| decl.source.trim().to_string())
}

fn expand(resolution: &Resolution, render: impl Fn(&Declaration) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render(resolution.root_declaration()));
    for dep in resolution.dependency_order() {
        let Some(decl) = resolution.declaration(&dep) else {
            continue;
        };
        let _ = writeln!(out, "{DEPENDENCY_SEPARATOR}");
        let _ = writeln!(out, "MSG: {dep}");
        let _ = writeln!(out, "{}", render(decl));
    }
    out.pop();
    out
}
