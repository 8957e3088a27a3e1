/// Plain text output for the document tree.
///
/// Both input formats produce the same [`Document`](crate::document::Document)
/// tree, so this module is the only place that decides what the text looks
/// like: paragraph and table layout, which embedded lists appear, and how
/// inline controls are substituted.
///
/// # Quick Start
///
/// ```rust
/// use hwptext::document::{Paragraph, Section};
/// use hwptext::text::{TableStyle, TextOptions, ToPlainText};
///
/// let mut para = Paragraph::new();
/// para.push_text("제목");
/// let section = Section { paragraphs: vec![para] };
///
/// let options = TextOptions::new().with_table_style(TableStyle::Boxed);
/// assert_eq!(section.to_plain_text_with_options(&options), "제목");
/// ```
mod config;
mod traits;
mod writer;

pub use config::{TableStyle, TextOptions};
pub use traits::ToPlainText;
pub use writer::TextWriter;
