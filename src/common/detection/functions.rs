//! Signature-based format detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::types::FormatKind;
use crate::ole::is_ole_file;

/// ZIP local file header signature
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Detect the format from the leading bytes of a document.
///
/// Only the container signature is checked: a compound file is reported as
/// [`FormatKind::Hwp`] and a zip archive as [`FormatKind::Hwpx`].
///
/// # Examples
///
/// ```
/// use hwptext::{FormatKind, detect_format};
/// assert_eq!(detect_format(b"PK\x03\x04rest"), Some(FormatKind::Hwpx));
/// assert_eq!(detect_format(b"plain text"), None);
/// ```
pub fn detect_format(bytes: &[u8]) -> Option<FormatKind> {
    if is_ole_file(bytes) {
        Some(FormatKind::Hwp)
    } else if bytes.starts_with(ZIP_MAGIC) {
        Some(FormatKind::Hwpx)
    } else {
        None
    }
}

/// Detect the format of a file by reading its first bytes.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Option<FormatKind> {
    let mut file = File::open(path).ok()?;
    let mut head = [0u8; 8];
    let read = file.read(&mut head).ok()?;
    detect_format(&head[..read])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_signatures() {
        let ole = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1\0\0";
        assert_eq!(detect_format(ole), Some(FormatKind::Hwp));
        assert_eq!(detect_format(b"PK\x03\x04"), Some(FormatKind::Hwpx));
        assert_eq!(detect_format(b"PK"), None);
        assert_eq!(detect_format(b""), None);
    }

    #[test]
    fn test_detect_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"PK\x03\x04 rest of archive").unwrap();
        assert_eq!(detect_format_from_path(&path), Some(FormatKind::Hwpx));
        assert_eq!(detect_format_from_path(dir.path().join("missing")), None);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("HWPX".parse::<FormatKind>(), Ok(FormatKind::Hwpx));
        assert!("docx".parse::<FormatKind>().is_err());
        assert_eq!(FormatKind::Hwp.to_string(), "hwp");
    }
}
