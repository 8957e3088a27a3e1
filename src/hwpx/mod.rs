//! HWPX reader.
//!
//! An HWPX document is a zip archive of OWPML XML parts. Body text lives in
//! `Contents/section<N>.xml`; `Preview/PrvText.txt` holds a plain-text
//! preview written by the authoring application.
//!
//! The section walk produces the same [`Document`](crate::document::Document)
//! tree as the HWP reader, so both formats render identically.

pub mod package;
pub mod parser;

pub use package::HwpxPackage;
pub use parser::parse_section;
