/// Package implementation for HWPX documents (.hwpx).
use super::parser::parse_section;
use crate::common::{Error, Result};
use crate::document::{Document, Section};
use crate::hwp::DecompressLimits;
use log::{debug, warn};
use std::cell::RefCell;
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

const SECTION_PREFIX: &str = "Contents/section";
const SECTION_SUFFIX: &str = ".xml";
const FIRST_SECTION: &str = "Contents/section0.xml";
const PREVIEW_TEXT_PART: &str = "Preview/PrvText.txt";
const MIMETYPE_PART: &str = "mimetype";

/// An HWPX (.hwpx) package.
///
/// # Examples
///
/// ```rust,no_run
/// use hwptext::hwp::DecompressLimits;
/// use hwptext::hwpx::HwpxPackage;
///
/// let bytes = std::fs::read("report.hwpx")?;
/// let pkg = HwpxPackage::parse(&bytes, DecompressLimits::default())?;
/// let doc = pkg.document()?;
/// println!("{} sections", doc.sections.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HwpxPackage<'data> {
    archive: RefCell<ZipArchive<Cursor<&'data [u8]>>>,
    mimetype: Option<String>,
    sections: Vec<String>,
    limits: DecompressLimits,
}

impl std::fmt::Debug for HwpxPackage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HwpxPackage")
            .field("mimetype", &self.mimetype)
            .field("sections", &self.sections)
            .finish()
    }
}

impl<'data> HwpxPackage<'data> {
    /// Open the zip container and index its section parts.
    pub fn parse(data: &'data [u8], limits: DecompressLimits) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;

        let mut numbered: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let index = name
                    .strip_prefix(SECTION_PREFIX)?
                    .strip_suffix(SECTION_SUFFIX)?
                    .parse::<u32>()
                    .ok()?;
                Some((index, name.to_string()))
            })
            .collect();
        numbered.sort_by_key(|(index, _)| *index);
        let sections: Vec<String> = numbered.into_iter().map(|(_, name)| name).collect();

        debug!("HWPX: {} parts, {} sections", archive.len(), sections.len());

        let mut pkg = Self {
            archive: RefCell::new(archive),
            mimetype: None,
            sections,
            limits,
        };
        pkg.mimetype = pkg
            .read_part(MIMETYPE_PART)
            .ok()
            .map(|mime| String::from_utf8_lossy(&mime).trim().to_string());
        Ok(pkg)
    }

    /// Content of the `mimetype` part (`application/hwp+zip`), if present.
    #[inline]
    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    /// Whether a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.borrow().index_for_name(name).is_some()
    }

    /// Section part names in numeric order.
    #[inline]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Read one part, bounded by the decompression limits.
    pub fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let file = match archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(Error::StreamNotFound(name.to_string())),
            Err(err) => return Err(err.into()),
        };

        let ceiling = self.limits.ceiling(file.compressed_size() as usize);
        if file.size() as usize > ceiling {
            return Err(Error::Decompression {
                stream: name.to_string(),
                reason: format!(
                    "declared size {} exceeds limit of {} bytes",
                    file.size(),
                    ceiling
                ),
            });
        }

        let mut data = Vec::with_capacity(file.size() as usize);
        file.take(ceiling as u64 + 1).read_to_end(&mut data)?;
        if data.len() > ceiling {
            return Err(Error::Decompression {
                stream: name.to_string(),
                reason: format!("output exceeds limit of {} bytes", ceiling),
            });
        }
        Ok(data)
    }

    /// Parse one section part.
    pub fn section(&self, name: &str) -> Result<Section> {
        let xml = self.read_part(name)?;
        let section = parse_section(name, &xml)?;
        debug!("{}: {} paragraphs", name, section.paragraphs.len());
        Ok(section)
    }

    /// Parse every section part in order.
    pub fn document(&self) -> Result<Document> {
        if self.sections.is_empty() {
            return Err(Error::StreamNotFound(FIRST_SECTION.to_string()));
        }
        let mut sections = Vec::with_capacity(self.sections.len());
        for name in &self.sections {
            sections.push(self.section(name)?);
        }
        Ok(Document { sections })
    }

    /// Text of `Preview/PrvText.txt`, if present.
    pub fn preview_text(&self) -> Option<String> {
        match self.read_part(PREVIEW_TEXT_PART) {
            Ok(data) => Some(String::from_utf8_lossy(&data).into_owned()),
            Err(Error::StreamNotFound(_)) => None,
            Err(err) => {
                warn!("unreadable preview text: {}", err);
                None
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::FileOptions;

    /// Zip the given parts in order.
    pub fn hwpx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<()> = FileOptions::default();
        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    /// A section part holding one text paragraph per entry.
    pub fn section_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|t| format!("<hp:p><hp:run><hp:t>{t}</hp:t></hp:run></hp:p>"))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><hs:sec xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph">{body}</hs:sec>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixture::*;
    use super::*;
    use crate::text::ToPlainText;

    #[test]
    fn test_sections_in_numeric_order() {
        let s0 = section_xml(&["zero"]);
        let s2 = section_xml(&["two"]);
        let s10 = section_xml(&["ten"]);
        let data = hwpx(&[
            ("mimetype", "application/hwp+zip"),
            ("Contents/header.xml", "<head/>"),
            ("Contents/section10.xml", &s10),
            ("Contents/section2.xml", &s2),
            ("Contents/section0.xml", &s0),
        ]);
        let pkg = HwpxPackage::parse(&data, DecompressLimits::default()).unwrap();
        assert_eq!(
            pkg.sections(),
            ["Contents/section0.xml", "Contents/section2.xml", "Contents/section10.xml"]
        );
        assert_eq!(pkg.mimetype(), Some("application/hwp+zip"));
        assert!(pkg.has_part("Contents/header.xml"));
        assert_eq!(pkg.document().unwrap().to_plain_text(), "zero\ntwo\nten");
    }

    #[test]
    fn test_no_sections() {
        let data = hwpx(&[("mimetype", "application/hwp+zip")]);
        let pkg = HwpxPackage::parse(&data, DecompressLimits::default()).unwrap();
        assert!(matches!(
            pkg.document(),
            Err(Error::StreamNotFound(ref s)) if s == "Contents/section0.xml"
        ));
        assert_eq!(pkg.preview_text(), None);
    }

    #[test]
    fn test_preview_text() {
        let data = hwpx(&[("Preview/PrvText.txt", "미리보기 <텍스트>")]);
        let pkg = HwpxPackage::parse(&data, DecompressLimits::default()).unwrap();
        assert_eq!(pkg.preview_text().as_deref(), Some("미리보기 <텍스트>"));
    }

    #[test]
    fn test_not_a_zip() {
        let err = HwpxPackage::parse(b"definitely not a zip", DecompressLimits::default())
            .unwrap_err();
        assert!(matches!(err, Error::Zip(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_section_names_part() {
        let data = hwpx(&[("Contents/section0.xml", "<hs:sec><hp:p></hs:sec>")]);
        let pkg = HwpxPackage::parse(&data, DecompressLimits::default()).unwrap();
        match pkg.document() {
            Err(Error::Xml(msg)) => assert!(msg.contains("Contents/section0.xml")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_part_size_limit() {
        let big = section_xml(&[&"가".repeat(4096)]);
        let data = hwpx(&[("Contents/section0.xml", &big)]);
        let limits = DecompressLimits::new().with_ratio(1).with_floor(64);
        let pkg = HwpxPackage::parse(&data, limits).unwrap();
        assert!(matches!(
            pkg.document(),
            Err(Error::Decompression { ref stream, .. }) if stream == "Contents/section0.xml"
        ));
    }
}
