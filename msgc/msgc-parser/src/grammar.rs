//! `nom` combinators for the tokens of a `.msg` line.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0},
    combinator::{all_consuming, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
};

/// A type token split into its parts, e.g. `geometry_msgs/Point[3]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeToken<'a> {
    pub package: Option<&'a str>,
    pub name: &'a str,
    /// `None` for scalars, `Some("")` for `[]`, `Some("3")` for `[3]`.
    pub array: Option<&'a str>,
}

/// `[A-Za-z][A-Za-z0-9_]*`
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_"))))))(input)
}

fn array_suffix(input: &str) -> IResult<&str, &str> {
    delimited(char('['), digit0, char(']'))(input)
}

fn type_token_inner(input: &str) -> IResult<&str, TypeToken<'_>> {
    let (rest, (package, name, array)) = tuple((
        opt(terminated(identifier, char('/'))),
        identifier,
        opt(array_suffix),
    ))(input)?;
    Ok((
        rest,
        TypeToken {
            package,
            name,
            array,
        },
    ))
}

/// Parse a complete type token. Returns `None` if anything is left over.
pub fn type_token(input: &str) -> Option<TypeToken<'_>> {
    all_consuming(type_token_inner)(input)
        .ok()
        .map(|(_, token)| token)
}
