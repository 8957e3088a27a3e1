use super::consts::*;
use super::file::OleError;
use crate::common::binary::{read_u16_le, read_u32_le, read_u64_le};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Name of the summary property stream in an HWP container.
pub const HWP_SUMMARY_STREAM: &str = "\u{0005}HwpSummaryInformation";

/// Seconds between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;

/// Document properties stored in the summary property stream.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HwpMetadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub comments: Option<String>,
    pub last_saved_by: Option<String>,
    pub revision_number: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub last_saved: Option<DateTime<Utc>>,
    pub last_printed: Option<DateTime<Utc>>,
    pub num_pages: Option<u32>,
    /// Free-form date text the editor stores next to the timestamps
    pub date_string: Option<String>,
}

impl HwpMetadata {
    /// True when no property was recognized.
    pub fn is_empty(&self) -> bool {
        *self == HwpMetadata::default()
    }

    /// `(label, value)` pairs for every property that is present.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let strings = [
            ("Title", &self.title),
            ("Subject", &self.subject),
            ("Author", &self.author),
            ("Keywords", &self.keywords),
            ("Comments", &self.comments),
            ("Last saved by", &self.last_saved_by),
            ("Revision", &self.revision_number),
            ("Date", &self.date_string),
        ];
        for (label, value) in strings {
            if let Some(v) = value {
                fields.push((label, v.clone()));
            }
        }
        let times = [
            ("Created", &self.created),
            ("Last saved", &self.last_saved),
            ("Last printed", &self.last_printed),
        ];
        for (label, value) in times {
            if let Some(v) = value {
                fields.push((label, v.to_rfc3339()));
            }
        }
        if let Some(pages) = self.num_pages {
            fields.push(("Pages", pages.to_string()));
        }
        fields
    }
}

/// Property value types
#[derive(Debug, Clone)]
pub enum PropertyValue {
    I2(i16),
    I4(i32),
    UI2(u16),
    UI4(u32),
    Bool(bool),
    Lpstr(String),
    Lpwstr(String),
    Filetime(u64),
    Blob(Vec<u8>),
    Empty,
}

/// Parse the summary property stream of an HWP document.
pub fn parse_summary_information(data: &[u8]) -> Result<HwpMetadata, OleError> {
    let props = parse_property_stream(data)?;
    let mut metadata = HwpMetadata::default();

    metadata.title = props.get(&2).and_then(extract_string);
    metadata.subject = props.get(&3).and_then(extract_string);
    metadata.author = props.get(&4).and_then(extract_string);
    metadata.keywords = props.get(&5).and_then(extract_string);
    metadata.comments = props.get(&6).and_then(extract_string);
    metadata.last_saved_by = props.get(&8).and_then(extract_string);
    metadata.revision_number = props.get(&9).and_then(extract_string);
    metadata.last_printed = props.get(&11).and_then(extract_time);
    metadata.created = props.get(&12).and_then(extract_time);
    metadata.last_saved = props.get(&13).and_then(extract_time);
    metadata.num_pages = match props.get(&14) {
        Some(PropertyValue::I4(v)) => u32::try_from(*v).ok(),
        Some(PropertyValue::UI4(v)) => Some(*v),
        _ => None,
    };
    metadata.date_string = props.get(&20).and_then(extract_string);

    Ok(metadata)
}

/// Parse a property set stream and return the first section's properties
///
/// Property streams contain metadata in a structured format according
/// to [MS-OLEPS] specification.
fn parse_property_stream(data: &[u8]) -> Result<HashMap<u32, PropertyValue>, OleError> {
    if data.len() < 48 {
        return Err(OleError::InvalidFormat(
            "Property stream too short".to_string(),
        ));
    }

    let mut properties = HashMap::new();

    // Skip header (28 bytes) and format ID (16 bytes)
    let section_offset = read_u32_le(data, 44)? as usize;
    let num_props = read_u32_le(data, section_offset.saturating_add(4)).map_err(|_| {
        OleError::InvalidFormat("Invalid section offset".to_string())
    })?;

    // Limit properties to prevent DoS
    let num_props = num_props.min(1000);

    for i in 0..num_props as usize {
        let prop_offset = section_offset + 8 + i * 8;
        let (Ok(prop_id), Ok(value_offset)) = (
            read_u32_le(data, prop_offset),
            read_u32_le(data, prop_offset + 4),
        ) else {
            break;
        };

        let value_offset = section_offset + value_offset as usize;
        let Ok(prop_type) = read_u16_le(data, value_offset) else {
            continue;
        };

        if let Ok(value) = parse_property_value(data, value_offset + 4, prop_type) {
            properties.insert(prop_id, value);
        }
    }

    Ok(properties)
}

/// Parse a single property value based on its type
fn parse_property_value(
    data: &[u8],
    offset: usize,
    prop_type: u16,
) -> Result<PropertyValue, OleError> {
    let value = match prop_type {
        VT_I2 => PropertyValue::I2(read_u16_le(data, offset)? as i16),
        VT_I4 | VT_INT | VT_ERROR => PropertyValue::I4(read_u32_le(data, offset)? as i32),
        VT_UI2 => PropertyValue::UI2(read_u16_le(data, offset)?),
        VT_UI4 | VT_UINT => PropertyValue::UI4(read_u32_le(data, offset)?),
        VT_BOOL => PropertyValue::Bool(read_u16_le(data, offset)? != 0),
        VT_FILETIME => PropertyValue::Filetime(read_u64_le(data, offset)?),
        VT_LPSTR | VT_BSTR => {
            let bytes = counted_bytes(data, offset, 1)?;
            // Remove null terminators
            let s = String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .to_string();
            PropertyValue::Lpstr(s)
        },
        VT_LPWSTR => {
            let bytes = counted_bytes(data, offset, 2)?;
            PropertyValue::Lpwstr(crate::common::binary::parse_utf16le_string(bytes))
        },
        VT_BLOB => PropertyValue::Blob(counted_bytes(data, offset, 1)?.to_vec()),
        VT_EMPTY | VT_NULL => PropertyValue::Empty,
        // Unsupported type
        _ => PropertyValue::Empty,
    };
    Ok(value)
}

/// A length-prefixed run of `count * unit` bytes.
fn counted_bytes(data: &[u8], offset: usize, unit: usize) -> Result<&[u8], OleError> {
    let count = read_u32_le(data, offset)? as usize;
    let start = offset + 4;
    count
        .checked_mul(unit)
        .and_then(|len| data.get(start..start.checked_add(len)?))
        .ok_or_else(|| OleError::InvalidFormat("String overflow".to_string()))
}

/// Extract string from property value
fn extract_string(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Lpstr(s) | PropertyValue::Lpwstr(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn extract_time(value: &PropertyValue) -> Option<DateTime<Utc>> {
    match value {
        PropertyValue::Filetime(ft) if *ft > 0 => filetime_to_datetime(*ft),
        _ => None,
    }
}

/// Convert a FILETIME (100 ns ticks since 1601) to a UTC timestamp.
pub fn filetime_to_datetime(filetime: u64) -> Option<DateTime<Utc>> {
    let secs = (filetime / 10_000_000) as i64 - FILETIME_UNIX_OFFSET;
    let nanos = ((filetime % 10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a one-section property set with the given `(id, type, payload)`.
    pub(crate) fn property_set(props: &[(u32, u16, Vec<u8>)]) -> Vec<u8> {
        let mut out = vec![0u8; 48];
        out[0..2].copy_from_slice(&0xFFFEu16.to_le_bytes());
        out[24..28].copy_from_slice(&1u32.to_le_bytes());
        out[44..48].copy_from_slice(&48u32.to_le_bytes());

        let mut values = Vec::new();
        let table_len = 8 + props.len() * 8;
        let mut table = Vec::new();
        for (id, vt, payload) in props {
            table.extend_from_slice(&id.to_le_bytes());
            table.extend_from_slice(&((table_len + values.len()) as u32).to_le_bytes());
            values.extend_from_slice(&(*vt as u32).to_le_bytes());
            values.extend_from_slice(payload);
            values.resize(values.len().next_multiple_of(4), 0);
        }
        let size = (table_len + values.len()) as u32;
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&(props.len() as u32).to_le_bytes());
        out.extend_from_slice(&table);
        out.extend_from_slice(&values);
        out
    }

    pub(crate) fn lpwstr(s: &str) -> Vec<u8> {
        let units: Vec<u16> = s.encode_utf16().chain(Some(0)).collect();
        let mut out = (units.len() as u32).to_le_bytes().to_vec();
        out.extend(units.iter().flat_map(|u| u.to_le_bytes()));
        out
    }

    #[test]
    fn test_parse_summary() {
        // 2024-01-02T03:04:05Z
        let filetime = (1_704_164_645u64 + FILETIME_UNIX_OFFSET as u64) * 10_000_000;
        let data = property_set(&[
            (2, VT_LPWSTR, lpwstr("보고서")),
            (4, VT_LPWSTR, lpwstr("홍길동")),
            (12, VT_FILETIME, filetime.to_le_bytes().to_vec()),
            (14, VT_I4, 3i32.to_le_bytes().to_vec()),
            (99, 0x1234, vec![1, 2, 3, 4]),
        ]);
        let meta = parse_summary_information(&data).unwrap();
        assert_eq!(meta.title.as_deref(), Some("보고서"));
        assert_eq!(meta.author.as_deref(), Some("홍길동"));
        assert_eq!(
            meta.created.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-01-02T03:04:05+00:00")
        );
        assert_eq!(meta.num_pages, Some(3));
        assert!(meta.subject.is_none());
        assert!(!meta.is_empty());
        assert_eq!(meta.fields()[0], ("Title", "보고서".to_string()));
    }

    #[test]
    fn test_truncated_stream() {
        assert!(parse_summary_information(&[0u8; 10]).is_err());
        let mut data = property_set(&[(2, VT_LPWSTR, lpwstr("abc"))]);
        data.truncate(data.len() - 6);
        // The damaged value is dropped, the stream itself still parses.
        let meta = parse_summary_information(&data).unwrap();
        assert!(meta.title.is_none());
    }
}
