//! Inline control character classification.
//!
//! Code units below 0x20 in paragraph text are control characters. Each one
//! occupies either a single code unit ("char" controls) or eight code units
//! ("inline" and "extended" controls, which carry a payload). The table
//! below is the single source of truth for both the class and the width.

use crate::document::{ControlClass, ControlId, ListKind};
use phf::phf_map;

/// Width of a control that carries a payload, in UTF-16 code units
pub const WIDE: u8 = 8;

/// Class and width for a range of control codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSpec {
    pub first: u16,
    pub last: u16,
    /// Code units consumed, including the code itself
    pub width: u8,
    pub class: ControlClass,
}

const fn spec(first: u16, last: u16, width: u8, class: ControlClass) -> ControlSpec {
    ControlSpec {
        first,
        last,
        width,
        class,
    }
}

/// Ordered, non-overlapping ranges covering codes 0..=31.
pub const CONTROL_TABLE: &[ControlSpec] = &[
    spec(0, 0, 1, ControlClass::Ignorable),
    spec(1, 1, WIDE, ControlClass::Ignorable),
    // section / column definition
    spec(2, 2, WIDE, ControlClass::Extended),
    // field start (extended), field end (inline)
    spec(3, 4, WIDE, ControlClass::FieldBoundary),
    spec(5, 7, WIDE, ControlClass::Ignorable),
    // title mark
    spec(8, 8, WIDE, ControlClass::Ignorable),
    spec(9, 9, WIDE, ControlClass::Tab),
    spec(10, 10, 1, ControlClass::LineBreak),
    // table, drawing object, equation
    spec(11, 11, WIDE, ControlClass::Extended),
    spec(12, 12, WIDE, ControlClass::Ignorable),
    spec(13, 13, 1, ControlClass::ParagraphBreak),
    spec(14, 14, WIDE, ControlClass::Ignorable),
    // hidden comment, header/footer, footnote/endnote, auto number
    spec(15, 18, WIDE, ControlClass::Extended),
    spec(19, 20, WIDE, ControlClass::Ignorable),
    // page control, bookmark, overlapping text
    spec(21, 23, WIDE, ControlClass::Extended),
    spec(24, 24, 1, ControlClass::Substitute('-')),
    spec(25, 29, 1, ControlClass::Ignorable),
    spec(30, 31, 1, ControlClass::Substitute(' ')),
];

const FALLBACK: ControlSpec = spec(0, 0x1F, 1, ControlClass::Ignorable);

/// Classify a UTF-16 code unit.
///
/// Returns `None` for ordinary text (0x20 and above).
///
/// # Examples
///
/// ```
/// use hwptext::document::ControlClass;
/// use hwptext::hwp::control::classify;
///
/// assert_eq!(classify(0x41), None);
/// assert_eq!(classify(10).map(|s| s.class), Some(ControlClass::LineBreak));
/// assert_eq!(classify(11).map(|s| s.width), Some(8));
/// ```
pub fn classify(code: u16) -> Option<ControlSpec> {
    if code >= 0x20 {
        return None;
    }
    let spec = CONTROL_TABLE
        .iter()
        .find(|s| (s.first..=s.last).contains(&code))
        .copied()
        .unwrap_or(FALLBACK);
    Some(spec)
}

/// What a `CTRL_HEADER` introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Table,
    /// Owns one paragraph list of the given kind
    List(ListKind),
    /// No extractable text (equations, page settings, fields, ...)
    Opaque,
}

static CONTROL_KINDS: phf::Map<&'static str, ControlKind> = phf_map! {
    "tbl " => ControlKind::Table,
    "gso " => ControlKind::List(ListKind::TextBox),
    "head" => ControlKind::List(ListKind::Header),
    "foot" => ControlKind::List(ListKind::Footer),
    "fn  " => ControlKind::List(ListKind::Footnote),
    "en  " => ControlKind::List(ListKind::Endnote),
    "tcmt" => ControlKind::List(ListKind::Comment),
};

/// Kind of object a control id introduces.
pub fn control_kind(id: ControlId) -> ControlKind {
    let chars = id.chars();
    std::str::from_utf8(&chars)
        .ok()
        .and_then(|key| CONTROL_KINDS.get(key))
        .copied()
        .unwrap_or(ControlKind::Opaque)
}
