//! Record and document writers for tests.

use super::header::{HeaderFlags, file_header_bytes};
use super::record::{
    HWPTAG_BIN_DATA as BIN_DATA, HWPTAG_CTRL_HEADER as CTRL_HEADER,
    HWPTAG_DOCUMENT_PROPERTIES as DOCUMENT_PROPERTIES, HWPTAG_LIST_HEADER as LIST_HEADER,
    HWPTAG_PARA_HEADER as PARA_HEADER, HWPTAG_PARA_TEXT as PARA_TEXT, HWPTAG_TABLE as TABLE,
};
use crate::document::ControlId;
use crate::ole::fixture::CompoundBuilder;
use flate2::Compression;
use flate2::write::{DeflateEncoder, ZlibEncoder};
use std::io::Write;

pub(crate) const V5: u32 = 0x0500_0300;

/// Encode one record, using the extended size field when needed.
pub(crate) fn record(tag: u16, level: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    let size = payload.len() as u32;
    let packed = (tag as u32 & 0x3FF) | ((level as u32 & 0x3FF) << 10);
    if size >= 0xFFF {
        out.extend_from_slice(&(packed | (0xFFF << 20)).to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
    } else {
        out.extend_from_slice(&(packed | (size << 20)).to_le_bytes());
    }
    out.extend_from_slice(payload);
    out
}

pub(crate) fn deflate_raw(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub(crate) fn deflate_zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// A piece of `PARA_TEXT` content.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TextUnit<'a> {
    Text(&'a str),
    /// One-unit control
    Char(u16),
    /// Eight-unit control without an id
    Inline(u16),
    /// Eight-unit control carrying a control id
    Extended(u16, ControlId),
}

pub(crate) fn para_text(units: &[TextUnit]) -> Vec<u8> {
    let mut out: Vec<u16> = Vec::new();
    for unit in units {
        match *unit {
            TextUnit::Text(s) => out.extend(s.encode_utf16()),
            TextUnit::Char(code) => out.push(code),
            TextUnit::Inline(code) => {
                out.push(code);
                out.extend([0u16; 6]);
                out.push(code);
            },
            TextUnit::Extended(code, id) => {
                let [a, b, c, d] = id.0.to_le_bytes();
                out.push(code);
                out.push(u16::from_le_bytes([a, b]));
                out.push(u16::from_le_bytes([c, d]));
                out.extend([0u16; 4]);
                out.push(code);
            },
        }
    }
    out.iter().flat_map(|u| u.to_le_bytes()).collect()
}

/// `PARA_HEADER` at `level` followed by its `PARA_TEXT`.
pub(crate) fn paragraph(level: u16, units: &[TextUnit]) -> Vec<u8> {
    let mut out = record(PARA_HEADER, level, &[0; 22]);
    out.extend(record(PARA_TEXT, level + 1, &para_text(units)));
    out
}

/// A plain paragraph ending with a paragraph break.
pub(crate) fn text_paragraph(level: u16, text: &str) -> Vec<u8> {
    paragraph(level, &[TextUnit::Text(text), TextUnit::Char(13)])
}

pub(crate) fn ctrl_header(level: u16, id: ControlId) -> Vec<u8> {
    let mut payload = id.0.to_le_bytes().to_vec();
    payload.extend([0u8; 40]);
    record(CTRL_HEADER, level, &payload)
}

pub(crate) fn table_record(level: u16, rows: u16, cols: u16) -> Vec<u8> {
    let mut payload = 0u32.to_le_bytes().to_vec();
    payload.extend(rows.to_le_bytes());
    payload.extend(cols.to_le_bytes());
    payload.extend([0u8; 10]);
    record(TABLE, level, &payload)
}

/// `LIST_HEADER` of a table cell with its address.
pub(crate) fn cell_header(level: u16, row: u16, col: u16, row_span: u16, col_span: u16) -> Vec<u8> {
    let mut payload = vec![0u8; 8];
    payload[0..2].copy_from_slice(&1u16.to_le_bytes());
    for v in [col, row, col_span, row_span] {
        payload.extend(v.to_le_bytes());
    }
    payload.extend([0u8; 26]);
    record(LIST_HEADER, level, &payload)
}

/// `LIST_HEADER` without cell attributes (captions, text boxes, notes).
pub(crate) fn list_header(level: u16) -> Vec<u8> {
    record(LIST_HEADER, level, &[1, 0, 0, 0, 0, 0, 0, 0])
}

/// A paragraph at `level` holding a table of single-paragraph cells.
///
/// `text` precedes the anchor in the paragraph.
pub(crate) fn table_paragraph(level: u16, text: &str, rows: u16, cols: u16, cells: &[&str]) -> Vec<u8> {
    let mut out = paragraph(
        level,
        &[
            TextUnit::Text(text),
            TextUnit::Extended(11, ControlId::TABLE),
            TextUnit::Char(13),
        ],
    );
    out.extend(ctrl_header(level + 1, ControlId::TABLE));
    out.extend(table_record(level + 2, rows, cols));
    for (i, cell) in cells.iter().enumerate() {
        let (row, col) = ((i / cols as usize) as u16, (i % cols as usize) as u16);
        out.extend(cell_header(level + 2, row, col, 1, 1));
        out.extend(text_paragraph(level + 2, cell));
    }
    out
}

pub(crate) fn document_properties(section_count: u16) -> Vec<u8> {
    let mut payload = section_count.to_le_bytes().to_vec();
    payload.extend([0u8; 24]);
    record(DOCUMENT_PROPERTIES, 0, &payload)
}

/// A `BIN_DATA` entry pointing at `BinData/BIN<id>.<ext>`.
pub(crate) fn bin_data(id: u16, ext: &str) -> Vec<u8> {
    let mut payload = 0x0001u16.to_le_bytes().to_vec();
    payload.extend(id.to_le_bytes());
    payload.extend((ext.len() as u16).to_le_bytes());
    payload.extend(ext.encode_utf16().flat_map(|u| u.to_le_bytes()));
    record(BIN_DATA, 1, &payload)
}

/// Writes a complete HWP compound file.
pub(crate) struct HwpFixture {
    flags: HeaderFlags,
    version: u32,
    doc_info: Option<Vec<u8>>,
    sections: Vec<Vec<u8>>,
    extra: Vec<(String, Vec<u8>)>,
}

impl HwpFixture {
    /// Compressed 5.0 document with a matching `DocInfo`.
    pub(crate) fn new() -> Self {
        Self {
            flags: HeaderFlags::COMPRESSED,
            version: V5,
            doc_info: None,
            sections: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub(crate) fn flags(mut self, flags: HeaderFlags) -> Self {
        self.flags = flags;
        self
    }

    pub(crate) fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Decompressed `DocInfo` records; defaults to the section count.
    pub(crate) fn doc_info(mut self, records: Vec<u8>) -> Self {
        self.doc_info = Some(records);
        self
    }

    /// Decompressed records of the next `BodyText/Section<N>`.
    pub(crate) fn section(mut self, records: Vec<u8>) -> Self {
        self.sections.push(records);
        self
    }

    /// A stream stored as given.
    pub(crate) fn stream(mut self, path: &str, data: &[u8]) -> Self {
        self.extra.push((path.to_string(), data.to_vec()));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let compressed = self.flags.contains(HeaderFlags::COMPRESSED);
        let pack = |data: &[u8]| if compressed { deflate_raw(data) } else { data.to_vec() };

        let doc_info = self
            .doc_info
            .unwrap_or_else(|| document_properties(self.sections.len() as u16));
        let mut builder = CompoundBuilder::new()
            .stream("FileHeader", &file_header_bytes(self.version, self.flags))
            .stream("DocInfo", &pack(&doc_info));
        for (i, section) in self.sections.iter().enumerate() {
            builder = builder.stream(&format!("BodyText/Section{i}"), &pack(section));
        }
        for (path, data) in &self.extra {
            builder = builder.stream(path, data);
        }
        builder.build()
    }
}
