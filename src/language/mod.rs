// Types representing the format string mini-language

mod types;

// Re-export all public symbols
pub use types::*;
