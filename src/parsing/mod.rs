//! parser for format strings

use tracing::debug;

use crate::language::FormatSpec;

mod parser;

pub use parser::ParseError;

/// Parse a format string into a FormatSpec, or explain why it didn't match
/// any of the grammars. Nothing partial is ever returned.
pub fn parse(raw: &str) -> Result<FormatSpec<'_>, ParseError> {
    match parser::parse_format(raw) {
        Ok(spec) => {
            debug!(mode = ?spec.mode(), "Parsed format string {:?}", raw);
            Ok(spec)
        }
        Err(error) => {
            debug!(?error);
            Err(error)
        }
    }
}

/// Format strings arriving from a host may not be text at all.
pub fn parse_bytes(raw: &[u8]) -> Result<FormatSpec<'_>, ParseError> {
    match std::str::from_utf8(raw) {
        Ok(text) => parse(text),
        Err(_) => Err(ParseError::NotAString),
    }
}
