//! Grammar for format strings, assembled once from named sub-patterns

use std::sync::OnceLock;

mod repository;

pub use repository::*;

/// The process-wide grammar. The definitions are fixed at compile time so
/// failing to build them is a bug in this crate, not a user error.
pub fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::build().unwrap_or_else(|e| panic!("{}", e)))
}
