//! Unified error types for hwptext.
//!
//! Every fatal error names the stream (or part) it came from and, where the
//! position is known, the byte offset inside it.
use thiserror::Error;

/// Main error type for hwptext operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed compound-file structure
    #[error("Container format error: {reason}{}", fmt_offset(.offset))]
    ContainerFormat { reason: String, offset: Option<u64> },

    /// A required stream or part is absent
    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    /// A compressed stream could not be inflated
    #[error("Decompression failed in {stream}: {reason}")]
    Decompression { stream: String, reason: String },

    /// Malformed record header or size
    #[error("Record format error in {stream} at offset {offset}: {reason}")]
    RecordFormat {
        stream: String,
        offset: usize,
        reason: String,
    },

    /// Unbalanced record nesting, only returned in strict mode
    #[error("Document structure error in {stream} at offset {offset}: {reason}")]
    DocumentStructure {
        stream: String,
        offset: usize,
        reason: String,
    },

    /// Input is not a document of the requested format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Recognized document that this crate refuses to decode
    #[error("Unsupported document: {0}")]
    Unsupported(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),
}

fn fmt_offset(offset: &Option<u64>) -> String {
    offset.map(|o| format!(" (offset {o:#x})")).unwrap_or_default()
}

/// Name used by callers of [`crate::convert`].
pub type ConversionError = Error;

/// Result type for hwptext operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = Error::RecordFormat {
            stream: "BodyText/Section0".to_string(),
            offset: 24,
            reason: "payload exceeds stream".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Record format error in BodyText/Section0 at offset 24: payload exceeds stream"
        );

        let err = Error::ContainerFormat {
            reason: "cyclic sector chain".to_string(),
            offset: Some(0x400),
        };
        assert_eq!(
            err.to_string(),
            "Container format error: cyclic sector chain (offset 0x400)"
        );

        let err = Error::ContainerFormat {
            reason: "bad magic".to_string(),
            offset: None,
        };
        assert_eq!(err.to_string(), "Container format error: bad magic");
    }
}
