/// Format-independent document tree.
///
/// Both readers produce the same shape: a [`Document`] holds [`Section`]s,
/// a section holds [`Paragraph`]s, and a paragraph holds an ordered list of
/// [`Inline`] children. Tables and embedded paragraph lists (text boxes,
/// notes, headers) sit inside the paragraph that anchors them, at the
/// position of their anchor.
///
/// The tree is strictly owned; a [`Cell`] records its grid coordinates but
/// holds no reference back to its table.
///
/// # Example
///
/// ```rust
/// use hwptext::document::{Paragraph, Section};
/// use hwptext::text::ToPlainText;
///
/// let mut para = Paragraph::new();
/// para.push_text("Hello");
/// let section = Section { paragraphs: vec![para] };
/// assert_eq!(section.to_plain_text(), "Hello");
/// ```
mod paragraph;
mod table;
mod types;

pub use paragraph::{Inline, Paragraph, Run};
pub use table::{Cell, GridBudget, GridDiagnostic, PendingCell, Table};
pub use types::{ControlChar, ControlClass, ControlId, EmbeddedList, ListKind};

/// One body section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub paragraphs: Vec<Paragraph>,
}

/// A whole converted document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    /// Iterate over every top-level paragraph of every section.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }

    /// Iterate over the tables anchored in top-level paragraphs.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.paragraphs().flat_map(|p| p.tables())
    }
}
