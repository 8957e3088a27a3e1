/// Package implementation for HWP 5.x documents (.hwp).
use super::builder::{BuiltSection, SectionBuilder};
use super::decompress::{DecompressLimits, decompress};
use super::doc_info::{DOC_INFO_STREAM, DocInfo};
use super::header::{FILE_HEADER_STREAM, FileHeader};
use super::record::RecordReader;
use crate::common::binary::parse_utf16le_string;
use crate::common::{Error, Result};
use crate::document::{Document, GridBudget, Section};
use crate::ole::{CompoundFile, HWP_SUMMARY_STREAM, HwpMetadata, parse_summary_information};
use log::{debug, warn};

const SECTION_PREFIX: &str = "BodyText/Section";
const FIRST_SECTION: &str = "BodyText/Section0";
const PREVIEW_TEXT_STREAM: &str = "PrvText";
const BIN_DATA_STORAGE: &str = "BinData/";

/// An HWP (.hwp) package.
///
/// Wraps the compound file and knows which streams hold what. Parsing
/// checks the `FileHeader` and refuses protected documents, so every
/// method after [`parse`](Self::parse) works on a readable document.
///
/// # Examples
///
/// ```rust,no_run
/// use hwptext::hwp::{DecompressLimits, HwpPackage};
///
/// let bytes = std::fs::read("report.hwp")?;
/// let pkg = HwpPackage::parse(&bytes, DecompressLimits::default())?;
/// println!("version {}", pkg.header().version);
/// for name in pkg.sections() {
///     println!("{}", name);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct HwpPackage<'data> {
    ole: CompoundFile<'data>,
    header: FileHeader,
    limits: DecompressLimits,
}

impl<'data> HwpPackage<'data> {
    /// Parse a package from the raw file bytes.
    pub fn parse(data: &'data [u8], limits: DecompressLimits) -> Result<Self> {
        let ole = CompoundFile::parse(data)?;
        if !ole.exists(FILE_HEADER_STREAM) {
            return Err(Error::InvalidFormat(
                "Not a valid HWP document: FileHeader stream not found".to_string(),
            ));
        }
        let header = FileHeader::parse(&ole.open_stream(FILE_HEADER_STREAM)?)?;
        debug!(
            "HWP {} (flags {:#x})",
            header.version,
            header.flags.bits()
        );
        header.ensure_readable()?;

        Ok(Self {
            ole,
            header,
            limits,
        })
    }

    #[inline]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The underlying compound file.
    #[inline]
    pub fn container(&self) -> &CompoundFile<'data> {
        &self.ole
    }

    /// Body section stream names in numeric order.
    pub fn sections(&self) -> Vec<String> {
        let mut numbered: Vec<(u32, String)> = self
            .ole
            .list_streams()
            .into_iter()
            .filter_map(|name| {
                let index = name.strip_prefix(SECTION_PREFIX)?.parse::<u32>().ok()?;
                Some((index, name))
            })
            .collect();
        numbered.sort_by_key(|(index, _)| *index);
        numbered.into_iter().map(|(_, name)| name).collect()
    }

    /// Read a record stream (`DocInfo`, `BodyText/Section*`), decompressed
    /// when the document is compressed.
    pub fn record_stream(&self, name: &str) -> Result<Vec<u8>> {
        let raw = self.ole.open_stream(name)?;
        let data = decompress(name, &raw, self.header.is_compressed(), &self.limits)?;
        Ok(data.into_owned())
    }

    /// Decoded `DocInfo` stream.
    pub fn doc_info(&self) -> Result<DocInfo> {
        DocInfo::parse(&self.record_stream(DOC_INFO_STREAM)?)
    }

    /// Build the tree of one body section.
    ///
    /// Padded table grids are bounded by [`GridBudget::for_input`] of the
    /// decompressed stream.
    pub fn section(&self, name: &str) -> Result<BuiltSection> {
        let data = self.record_stream(name)?;
        SectionBuilder::new()
            .with_grid_budget(GridBudget::for_input(data.len()))
            .build_from(RecordReader::new(name, &data))
    }

    /// Build the whole document.
    ///
    /// Structure problems are repaired and logged; with `strict` the first
    /// one is returned as [`Error::DocumentStructure`] instead.
    pub fn document(&self, strict: bool) -> Result<Document> {
        let names = self.sections();
        if !names.iter().any(|n| n == FIRST_SECTION) {
            return Err(Error::StreamNotFound(FIRST_SECTION.to_string()));
        }

        match self.doc_info() {
            Ok(DocInfo {
                section_count: Some(count),
                ..
            }) if count as usize != names.len() => warn!(
                "DocInfo declares {} sections, found {}",
                count,
                names.len()
            ),
            Ok(_) => {},
            Err(err) => warn!("ignoring unreadable DocInfo: {}", err),
        }

        let mut sections: Vec<Section> = Vec::with_capacity(names.len());
        for name in &names {
            let built = self.section(name)?;
            if strict && let Some(first) = built.diagnostics.first() {
                return Err(Error::DocumentStructure {
                    stream: name.clone(),
                    offset: first.offset,
                    reason: first.to_string(),
                });
            }
            for diag in &built.diagnostics {
                warn!("{}: offset {}: {}", name, diag.offset, diag);
            }
            debug!(
                "{}: {} paragraphs",
                name,
                built.section.paragraphs.len()
            );
            sections.push(built.section);
        }

        Ok(Document { sections })
    }

    /// Text of the `PrvText` preview stream, if present.
    pub fn preview_text(&self) -> Option<String> {
        let data = self.ole.open_stream(PREVIEW_TEXT_STREAM).ok()?;
        Some(parse_utf16le_string(&data))
    }

    /// Summary information (title, author, dates).
    pub fn metadata(&self) -> Option<HwpMetadata> {
        let data = self.ole.open_stream(HWP_SUMMARY_STREAM).ok()?;
        match parse_summary_information(&data) {
            Ok(meta) => Some(meta),
            Err(err) => {
                debug!("unreadable summary information: {}", err);
                None
            },
        }
    }

    /// Names of the embedded binary streams; their content is never decoded.
    pub fn bin_data_streams(&self) -> Vec<String> {
        self.ole
            .list_streams()
            .into_iter()
            .filter(|name| name.starts_with(BIN_DATA_STORAGE))
            .collect()
    }
}
