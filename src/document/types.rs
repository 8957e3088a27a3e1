//! Leaf types of the document tree.

use super::Paragraph;

/// How an inline control character behaves in the text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlClass {
    /// Soft line break inside a paragraph
    LineBreak,
    /// End of paragraph; boundaries normally arrive as records
    ParagraphBreak,
    Tab,
    /// Start or end of a field; the field's cached text follows as runs
    FieldBoundary,
    /// Rendered as a fixed character (hyphen, non-breaking spaces)
    Substitute(char),
    /// No textual meaning
    Ignorable,
    /// Anchor of an object described by separate records
    Extended,
}

impl ControlClass {
    /// Text emitted for this class, if any.
    #[inline]
    pub fn substitute(self) -> Option<char> {
        match self {
            ControlClass::LineBreak => Some('\n'),
            ControlClass::Tab => Some('\t'),
            ControlClass::Substitute(ch) => Some(ch),
            _ => None,
        }
    }
}

/// Four-character control identifier, e.g. `tbl ` or `fn  `.
///
/// Stored the way HWP stores it: the first character in the most
/// significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub u32);

impl ControlId {
    pub const TABLE: ControlId = ControlId::from_chars(*b"tbl ");
    pub const GENERIC_SHAPE: ControlId = ControlId::from_chars(*b"gso ");
    pub const EQUATION: ControlId = ControlId::from_chars(*b"eqed");
    pub const HEADER: ControlId = ControlId::from_chars(*b"head");
    pub const FOOTER: ControlId = ControlId::from_chars(*b"foot");
    pub const FOOTNOTE: ControlId = ControlId::from_chars(*b"fn  ");
    pub const ENDNOTE: ControlId = ControlId::from_chars(*b"en  ");
    pub const HIDDEN_COMMENT: ControlId = ControlId::from_chars(*b"tcmt");

    #[inline]
    pub const fn from_chars(chars: [u8; 4]) -> Self {
        ControlId(u32::from_be_bytes(chars))
    }

    #[inline]
    pub fn chars(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.chars() {
            let ch = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

/// An inline control character kept in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChar {
    pub code: u16,
    pub class: ControlClass,
    /// Identifier carried by extended controls
    pub id: Option<ControlId>,
}

/// What a non-cell paragraph list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    TextBox,
    Header,
    Footer,
    Footnote,
    Endnote,
    Comment,
    Other,
}

/// Paragraphs owned by an object anchored in a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedList {
    pub kind: ListKind,
    pub paragraphs: Vec<Paragraph>,
}
