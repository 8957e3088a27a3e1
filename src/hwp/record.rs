//! Record stream tokenizer.
//!
//! A decompressed `DocInfo` or `BodyText/Section*` stream is a flat run of
//! records. Each starts with a little-endian u32 header packing a 10-bit tag,
//! a 10-bit nesting level and a 12-bit payload size; a size of `0xFFF` means
//! the real size follows as a separate u32.

use crate::common::binary::read_u32_le;
use crate::common::{Error, Result};

/// First tag id of the HWP tag space
pub const HWPTAG_BEGIN: u16 = 0x10;

pub const HWPTAG_DOCUMENT_PROPERTIES: u16 = HWPTAG_BEGIN;
pub const HWPTAG_BIN_DATA: u16 = HWPTAG_BEGIN + 2;
pub const HWPTAG_PARA_HEADER: u16 = HWPTAG_BEGIN + 50;
pub const HWPTAG_PARA_TEXT: u16 = HWPTAG_BEGIN + 51;
pub const HWPTAG_CTRL_HEADER: u16 = HWPTAG_BEGIN + 55;
pub const HWPTAG_LIST_HEADER: u16 = HWPTAG_BEGIN + 56;
pub const HWPTAG_TABLE: u16 = HWPTAG_BEGIN + 61;

const SIZE_ESCAPE: u32 = 0xFFF;

/// Record tags this crate interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HwpTag {
    DocumentProperties,
    IdMappings,
    BinData,
    FaceName,
    ParaHeader,
    ParaText,
    ParaCharShape,
    ParaLineSeg,
    ParaRangeTag,
    CtrlHeader,
    ListHeader,
    PageDef,
    FootnoteShape,
    PageBorderFill,
    ShapeComponent,
    Table,
    CtrlData,
    EqEdit,
    Unknown(u16),
}

impl From<u16> for HwpTag {
    fn from(id: u16) -> Self {
        match id {
            0x10 => HwpTag::DocumentProperties,
            0x11 => HwpTag::IdMappings,
            0x12 => HwpTag::BinData,
            0x13 => HwpTag::FaceName,
            0x42 => HwpTag::ParaHeader,
            0x43 => HwpTag::ParaText,
            0x44 => HwpTag::ParaCharShape,
            0x45 => HwpTag::ParaLineSeg,
            0x46 => HwpTag::ParaRangeTag,
            0x47 => HwpTag::CtrlHeader,
            0x48 => HwpTag::ListHeader,
            0x49 => HwpTag::PageDef,
            0x4A => HwpTag::FootnoteShape,
            0x4B => HwpTag::PageBorderFill,
            0x4C => HwpTag::ShapeComponent,
            0x4D => HwpTag::Table,
            0x57 => HwpTag::CtrlData,
            0x58 => HwpTag::EqEdit,
            other => HwpTag::Unknown(other),
        }
    }
}

/// One record, borrowing its payload from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'data> {
    /// Raw tag id
    pub tag_id: u16,
    /// Nesting depth in the logical tree
    pub level: u16,
    /// Payload size in bytes
    pub size: u32,
    /// Byte offset of the record header in the stream
    pub offset: usize,
    pub data: &'data [u8],
}

impl<'data> Record<'data> {
    #[inline]
    pub fn tag(&self) -> HwpTag {
        HwpTag::from(self.tag_id)
    }

    /// Parse the record whose header starts at `offset`.
    ///
    /// Returns the record and the total number of bytes it occupies.
    /// Errors carry only a reason; [`RecordReader`] adds the stream name.
    pub fn parse(data: &'data [u8], offset: usize) -> std::result::Result<(Self, usize), String> {
        let header = read_u32_le(data, offset).map_err(|_| {
            format!(
                "incomplete record header ({} trailing bytes)",
                data.len().saturating_sub(offset)
            )
        })?;

        let tag_id = (header & 0x3FF) as u16;
        let level = ((header >> 10) & 0x3FF) as u16;
        let mut size = header >> 20;
        let mut header_len = 4;

        if size == SIZE_ESCAPE {
            size = read_u32_le(data, offset + 4)
                .map_err(|_| "incomplete extended size field".to_string())?;
            header_len = 8;
        }

        let start = offset + header_len;
        let remaining = data.len() - start;
        if size as usize > remaining {
            return Err(format!(
                "payload of {} bytes exceeds the {} bytes left in the stream",
                size, remaining
            ));
        }

        let record = Record {
            tag_id,
            level,
            size,
            offset,
            data: &data[start..start + size as usize],
        };
        Ok((record, header_len + size as usize))
    }
}

/// Lazy, single-pass iterator over the records of a stream.
///
/// After the first error the iterator is exhausted.
pub struct RecordReader<'data> {
    stream: String,
    data: &'data [u8],
    offset: usize,
    failed: bool,
}

impl<'data> RecordReader<'data> {
    /// Tokenize `data`; `stream` names the stream in errors.
    #[inline]
    pub fn new(stream: impl Into<String>, data: &'data [u8]) -> Self {
        Self {
            stream: stream.into(),
            data,
            offset: 0,
            failed: false,
        }
    }

    #[inline]
    pub fn stream(&self) -> &str {
        &self.stream
    }
}

impl<'data> Iterator for RecordReader<'data> {
    type Item = Result<Record<'data>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match Record::parse(self.data, self.offset) {
            Ok((record, consumed)) => {
                self.offset += consumed;
                Some(Ok(record))
            },
            Err(reason) => {
                self.failed = true;
                Some(Err(Error::RecordFormat {
                    stream: self.stream.clone(),
                    offset: self.offset,
                    reason,
                }))
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.data.len().saturating_sub(self.offset);
        (remaining.min(1), Some(remaining / 4 + 1))
    }
}

impl std::iter::FusedIterator for RecordReader<'_> {}
