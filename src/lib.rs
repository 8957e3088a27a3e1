//! hwptext - plain text from Hangul word processor documents
//!
//! This library converts HWP 5.x binary documents (.hwp) and HWPX documents
//! (.hwpx) to UTF-8 plain text, keeping paragraph order and table layout.
//!
//! # Features
//!
//! - **Compound file reader**: FAT, mini FAT and directory walk over a byte slice
//! - **HWP reader**: stream decompression, record tokenizing and tree building
//!   with recovery from unbalanced nesting
//! - **HWPX reader** (feature `hwpx`, on by default): section XML walk
//! - **Plain text output**: delimited or box-drawn tables, optional notes,
//!   headers and comments
//! - **Batch conversion**: many files on the rayon pool
//!
//! # Example
//!
//! ```no_run
//! use hwptext::{FormatKind, convert};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = "보고서.hwp";
//! let format = FormatKind::from_path(path).ok_or("unknown extension")?;
//! let text = convert(&std::fs::read(path)?, format)?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Working with the document tree
//!
//! ```no_run
//! use hwptext::hwp::{DecompressLimits, HwpPackage};
//! use hwptext::text::ToPlainText;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("보고서.hwp")?;
//! let pkg = HwpPackage::parse(&bytes, DecompressLimits::default())?;
//! let doc = pkg.document(false)?;
//! for table in doc.tables() {
//!     println!("{}x{} table", table.rows, table.cols);
//!     println!("{}", table.to_plain_text());
//! }
//! # Ok(())
//! # }
//! ```

/// Shared binary helpers, errors and format selection
pub mod common;

/// Compound file (OLE2) container reader
pub mod ole;

/// Format-independent document tree
pub mod document;

/// HWP 5.x binary document reader
pub mod hwp;

/// HWPX document reader
#[cfg(feature = "hwpx")]
pub mod hwpx;

/// Plain text rendering of the document tree
pub mod text;

/// Parallel conversion of many files
pub mod batch;

mod convert;

pub use common::{ConversionError, Error, FormatKind, Result, detect_format, detect_format_from_path};
pub use convert::{
    Conversion, ConvertOptions, DEFAULT_MAX_INPUT_SIZE, convert, convert_document, convert_with_options,
};
pub use document::Document;
pub use text::{TableStyle, TextOptions, ToPlainText};
