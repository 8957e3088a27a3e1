//! Document format selection.
//!
//! Conversion never guesses the input format; callers pick one, usually from
//! the file extension, and may confirm it against the leading signature with
//! [`detect_format`].

// Submodule declarations
pub mod functions;
pub mod types;

// Re-exports
pub use functions::{detect_format, detect_format_from_path};
pub use types::FormatKind;
