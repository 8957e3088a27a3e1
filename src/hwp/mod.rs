//! HWP 5.x binary documents.
//!
//! An HWP file is a compound file. `FileHeader` says whether the record
//! streams are compressed; `DocInfo` holds document-wide tables; the text
//! lives in `BodyText/Section0`, `BodyText/Section1`, ... Each record stream
//! is decompressed ([`decompress`]), tokenized ([`RecordReader`]) and turned
//! into a [`Section`](crate::document::Section) by [`SectionBuilder`].
//!
//! # Example
//!
//! ```rust,no_run
//! use hwptext::hwp::{DecompressLimits, HwpPackage};
//! use hwptext::text::ToPlainText;
//!
//! let bytes = std::fs::read("report.hwp")?;
//! let pkg = HwpPackage::parse(&bytes, DecompressLimits::default())?;
//! let doc = pkg.document(false)?;
//! println!("{}", doc.to_plain_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod control;
pub mod decompress;
pub mod doc_info;
pub mod header;
pub mod package;
pub mod para_text;
pub mod record;

#[cfg(test)]
pub(crate) mod fixture;

pub use builder::{BuiltSection, SectionBuilder, StructureError};
pub use control::{CONTROL_TABLE, ControlKind, ControlSpec, classify, control_kind};
pub use decompress::{DecompressLimits, decompress};
pub use doc_info::{BinDataEntry, BinDataKind, DocInfo};
pub use header::{FileHeader, HeaderFlags, HwpVersion};
pub use package::HwpPackage;
pub use record::{HwpTag, Record, RecordReader};
