//! Unified error types for hwptext.
//!
//! This module provides a unified error type that encompasses errors from the
//! compound-file reader, the HWP record pipeline and the HWPX reader,
//! presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{ConversionError, Error, Result};
