/// Configuration types for plain text output.
use crate::document::ListKind;

/// Options for plain text output.
///
/// # Examples
///
/// ```rust
/// use hwptext::text::{TableStyle, TextOptions};
///
/// let options = TextOptions::new()
///     .with_table_style(TableStyle::Boxed)
///     .with_notes(true);
/// assert!(options.include_notes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// How to render tables
    pub table_style: TableStyle,
    /// Separator between cells in [`TableStyle::Delimited`] output
    pub column_delimiter: String,
    /// Whether to emit footnotes and endnotes
    pub include_notes: bool,
    /// Whether to emit page headers and footers
    pub include_headers_footers: bool,
    /// Whether to emit hidden comments
    pub include_comments: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            table_style: TableStyle::Delimited,
            column_delimiter: "\t".to_string(),
            include_notes: false,
            include_headers_footers: false,
            include_comments: false,
        }
    }
}

impl TextOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    /// Set the cell separator for delimited tables.
    #[inline]
    pub fn with_column_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.column_delimiter = delimiter.into();
        self
    }

    #[inline]
    pub fn with_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }

    #[inline]
    pub fn with_headers_footers(mut self, include: bool) -> Self {
        self.include_headers_footers = include;
        self
    }

    #[inline]
    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    /// Whether paragraphs of an embedded list of this kind are emitted.
    pub fn includes(&self, kind: ListKind) -> bool {
        match kind {
            ListKind::TextBox | ListKind::Other => true,
            ListKind::Header | ListKind::Footer => self.include_headers_footers,
            ListKind::Footnote | ListKind::Endnote => self.include_notes,
            ListKind::Comment => self.include_comments,
        }
    }
}

/// Table rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// One line per row, cells separated by the column delimiter.
    ///
    /// ```text
    /// A	B
    /// C	D
    /// ```
    #[default]
    Delimited,

    /// Box-drawing grid with padded columns.
    ///
    /// ```text
    /// ┌─────┬─────┐
    /// │ A   │ B   │
    /// ├─────┼─────┤
    /// │ C   │ D   │
    /// └─────┴─────┘
    /// ```
    Boxed,
}

impl std::str::FromStr for TableStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delimited" | "tsv" => Ok(TableStyle::Delimited),
            "boxed" | "box" => Ok(TableStyle::Boxed),
            other => Err(format!("unknown table style: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_options_builder() {
        let options = TextOptions::new()
            .with_table_style(TableStyle::Boxed)
            .with_column_delimiter(" | ")
            .with_notes(true)
            .with_headers_footers(true)
            .with_comments(false);

        assert_eq!(options.table_style, TableStyle::Boxed);
        assert_eq!(options.column_delimiter, " | ");
        assert!(options.includes(ListKind::Footnote));
        assert!(options.includes(ListKind::Footer));
        assert!(!options.includes(ListKind::Comment));
    }

    #[test]
    fn test_text_options_default() {
        let options = TextOptions::default();
        assert_eq!(options.table_style, TableStyle::Delimited);
        assert_eq!(options.column_delimiter, "\t");
        assert!(options.includes(ListKind::TextBox));
        assert!(!options.includes(ListKind::Header));
        assert!(!options.includes(ListKind::Endnote));
    }

    #[test]
    fn test_table_style_from_str() {
        assert_eq!("Boxed".parse::<TableStyle>(), Ok(TableStyle::Boxed));
        assert_eq!("delimited".parse::<TableStyle>(), Ok(TableStyle::Delimited));
        assert!("html".parse::<TableStyle>().is_err());
    }
}
