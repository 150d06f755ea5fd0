use msgc_core::{CompilerConfig, ParseError, ServiceDeclaration, TypeRef};

use crate::{lex::is_service_separator, parser::parse_lines};

/// Names of the request and response types of service `type_ref`.
pub fn service_halves(type_ref: &TypeRef) -> (TypeRef, TypeRef) {
    (
        TypeRef::new(&type_ref.package, format!("{}Request", type_ref.name)),
        TypeRef::new(&type_ref.package, format!("{}Response", type_ref.name)),
    )
}

/// Parse a `.srv` unit into request and response declarations.
///
/// The halves are named `<Name>Request` and `<Name>Response` in the service's
/// package. Error line numbers refer to the whole `.srv` text.
pub fn parse_service(
    type_ref: &TypeRef,
    text: &str,
    config: &CompilerConfig,
) -> Result<ServiceDeclaration, ParseError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    let mut separators = lines.iter().filter(|(_, l)| is_service_separator(l));
    let Some(&(sep_line, _)) = separators.next() else {
        return Err(ParseError::Syntax {
            unit: type_ref.to_string(),
            line: lines.len() + 1,
            token: String::new(),
            detail: "missing `---` separator between request and response".to_string(),
        });
    };
    if let Some(&(line, raw)) = separators.next() {
        return Err(ParseError::Syntax {
            unit: type_ref.to_string(),
            line,
            token: raw.trim().to_string(),
            detail: "more than one `---` separator".to_string(),
        });
    }

    let (request_lines, response_lines) = lines.split_at(sep_line - 1);
    let response_lines = &response_lines[1..];

    let (request_ref, response_ref) = service_halves(type_ref);

    let request = parse_lines(
        &request_ref,
        request_lines.iter().copied(),
        join_source(request_lines),
        config,
    )?;
    let response = parse_lines(
        &response_ref,
        response_lines.iter().copied(),
        join_source(response_lines),
        config,
    )?;

    Ok(ServiceDeclaration {
        type_ref: type_ref.clone(),
        request,
        response,
    })
}

fn join_source(lines: &[(usize, &str)]) -> String {
    lines
        .iter()
        .map(|(_, l)| *l)
        .collect::<Vec<_>>()
        .join("\n")
}
