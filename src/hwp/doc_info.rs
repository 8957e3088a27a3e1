//! The `DocInfo` stream: document-wide properties.
//!
//! Only the parts that matter for text extraction are decoded: the declared
//! number of body sections and the binary data table.

use super::record::{HwpTag, RecordReader};
use crate::common::Result;
use crate::common::binary::{parse_utf16le_string, read_u16_le};
use log::debug;

/// Stream name of the document information records
pub const DOC_INFO_STREAM: &str = "DocInfo";

/// How a `BIN_DATA` entry stores its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinDataKind {
    /// File outside the document
    Link,
    /// Stream under `BinData/`
    Embedding,
    /// OLE storage under `BinData/`
    Storage,
}

/// One entry of the binary data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinDataEntry {
    pub kind: BinDataKind,
    /// Storage id for embedded entries
    pub id: Option<u16>,
    /// File extension for embedded entries, e.g. `png`
    pub extension: Option<String>,
}

impl BinDataEntry {
    /// Stream path of an embedded entry, e.g. `BinData/BIN0001.png`.
    pub fn stream_name(&self) -> Option<String> {
        let id = self.id?;
        Some(match (&self.kind, &self.extension) {
            (BinDataKind::Embedding, Some(ext)) => format!("BinData/BIN{:04X}.{}", id, ext),
            _ => format!("BinData/BIN{:04X}", id),
        })
    }
}

/// Decoded `DocInfo` content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocInfo {
    /// Section count from `DOCUMENT_PROPERTIES`
    pub section_count: Option<u16>,
    pub bin_data: Vec<BinDataEntry>,
}

impl DocInfo {
    /// Parse decompressed `DocInfo` bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut info = DocInfo::default();
        for record in RecordReader::new(DOC_INFO_STREAM, data) {
            let record = record?;
            match record.tag() {
                HwpTag::DocumentProperties => {
                    info.section_count = read_u16_le(record.data, 0).ok();
                },
                HwpTag::BinData => info.bin_data.push(parse_bin_data(record.data)),
                _ => {},
            }
        }
        debug!(
            "DocInfo: {:?} sections, {} binary items",
            info.section_count,
            info.bin_data.len()
        );
        Ok(info)
    }
}

fn parse_bin_data(data: &[u8]) -> BinDataEntry {
    let flags = read_u16_le(data, 0).unwrap_or(0);
    let kind = match flags & 0x000F {
        1 => BinDataKind::Embedding,
        2 => BinDataKind::Storage,
        _ => BinDataKind::Link,
    };
    if kind == BinDataKind::Link {
        return BinDataEntry {
            kind,
            id: None,
            extension: None,
        };
    }

    let id = read_u16_le(data, 2).ok();
    let extension = read_u16_le(data, 4).ok().and_then(|len| {
        let end = 6 + len as usize * 2;
        data.get(6..end)
            .map(parse_utf16le_string)
            .filter(|ext| !ext.is_empty())
    });
    BinDataEntry {
        kind,
        id,
        extension,
    }
}
