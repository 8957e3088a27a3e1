/// Core trait for plain text conversion.
use super::config::TextOptions;
use super::writer::TextWriter;
use crate::document::{Document, Paragraph, Section, Table};

/// Types that can be rendered as plain text.
///
/// Rendering is a pure walk over an in-memory tree, so it cannot fail and
/// the same tree always yields the same text.
///
/// # Examples
///
/// ```rust
/// use hwptext::document::Paragraph;
/// use hwptext::text::{TextOptions, ToPlainText};
///
/// let mut para = Paragraph::new();
/// para.push_text("안녕하세요");
/// assert_eq!(para.to_plain_text(), "안녕하세요");
/// assert_eq!(para.to_plain_text_with_options(&TextOptions::new()), "안녕하세요");
/// ```
pub trait ToPlainText {
    /// Render with default options.
    fn to_plain_text(&self) -> String {
        self.to_plain_text_with_options(&TextOptions::default())
    }

    fn to_plain_text_with_options(&self, options: &TextOptions) -> String;
}

impl ToPlainText for Document {
    fn to_plain_text_with_options(&self, options: &TextOptions) -> String {
        let mut writer = TextWriter::new(options);
        for section in &self.sections {
            writer.write_section(section);
        }
        writer.finish()
    }
}

impl ToPlainText for Section {
    fn to_plain_text_with_options(&self, options: &TextOptions) -> String {
        let mut writer = TextWriter::new(options);
        writer.write_section(self);
        writer.finish()
    }
}

impl ToPlainText for Paragraph {
    fn to_plain_text_with_options(&self, options: &TextOptions) -> String {
        let mut writer = TextWriter::new(options);
        writer.write_paragraph(self);
        writer.finish()
    }
}

impl ToPlainText for Table {
    fn to_plain_text_with_options(&self, options: &TextOptions) -> String {
        let mut writer = TextWriter::new(options);
        writer.write_table(self);
        writer.finish()
    }
}
