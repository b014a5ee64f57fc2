//! Python-style mini format-spec rendering for generated values

mod formatter;
mod specifier;

pub use formatter::format_value;
pub use specifier::{Align, FormatError, Sign, Specifier, MAXIMUM_WIDTH};
