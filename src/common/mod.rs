//! Common types, traits, and utilities shared across formats.
//!
//! This module provides the binary readers, the unified error type and the
//! format selection helpers used by both the HWP and HWPX readers.

// Submodule declarations
pub mod binary;
pub mod detection;
pub mod error;

// Re-exports for convenience
pub use detection::{FormatKind, detect_format, detect_format_from_path};
pub use error::{ConversionError, Error, Result};
