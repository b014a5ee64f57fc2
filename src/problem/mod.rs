// Presenting notices and errors to the user

mod format;
mod messages;

// Re-export all public symbols
pub use format::*;
pub use messages::generate_error_message;
