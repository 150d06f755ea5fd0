//! ROS1 `.msg` / `.srv` definition parser.
//!
//! ```text
//! unit text
//!   └─ split_comment  : semantic content + verbatim comment per line
//!       └─ type_token : nom grammar for `pkg/Name[N]`
//!           └─ Declaration (fields, constants, comments, source)
//! ```
//!
//! Bare nested type names are qualified here: reserved names (`Header`) go to
//! the configured builtin package, everything else to the declaring package
//! with [`msgc_core::Field::implicit_package`] set so the resolver may fall
//! back to its search path.

mod grammar;
mod lex;
mod parser;
mod service;

pub use lex::{COMMENT_MARKER, SERVICE_SEPARATOR};
pub use parser::parse_message;
pub use service::{parse_service, service_halves};
