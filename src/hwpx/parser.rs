//! Section part parser.
//!
//! Walks `Contents/section<N>.xml` with a streaming reader and builds the
//! same tree the binary reader produces. Element names are matched by local
//! name, so every revision of the paragraph namespace is accepted.

use crate::common::{Error, Result};
use crate::document::{
    ControlClass, EmbeddedList, GridBudget, Inline, ListKind, Paragraph, PendingCell, Section,
    Table,
};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use log::{trace, warn};

#[derive(Debug)]
enum Frame {
    Paragraph(Paragraph),
    Table {
        rows: u16,
        cols: u16,
        cells: Vec<PendingCell>,
        caption: Vec<Paragraph>,
    },
    Cell(PendingCell),
    Caption(Vec<Paragraph>),
    List(EmbeddedList),
}

fn list_kind(name: &[u8]) -> Option<ListKind> {
    Some(match name {
        b"header" => ListKind::Header,
        b"footer" => ListKind::Footer,
        b"footNote" => ListKind::Footnote,
        b"endNote" => ListKind::Endnote,
        b"hiddenComment" => ListKind::Comment,
        b"drawText" => ListKind::TextBox,
        _ => return None,
    })
}

fn attr_u16(e: &BytesStart<'_>, key: &[u8]) -> Option<u16> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.trim().parse().ok())
}

struct SectionParser<'p> {
    part: &'p str,
    stack: Vec<Frame>,
    section: Section,
    /// Depth of open `t` elements
    text_depth: usize,
    grid_budget: GridBudget,
}

impl<'p> SectionParser<'p> {
    fn new(part: &'p str, grid_budget: GridBudget) -> Self {
        Self {
            part,
            stack: Vec::new(),
            section: Section::default(),
            text_depth: 0,
            grid_budget,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) {
        let local = e.local_name();
        let name = local.as_ref();
        match name {
            b"p" => self.stack.push(Frame::Paragraph(Paragraph::new())),
            b"t" => self.text_depth += 1,
            b"tbl" => self.stack.push(Frame::Table {
                rows: attr_u16(e, b"rowCnt").unwrap_or(0),
                cols: attr_u16(e, b"colCnt").unwrap_or(0),
                cells: Vec::new(),
                caption: Vec::new(),
            }),
            b"tc" => self.stack.push(Frame::Cell(PendingCell {
                address: None,
                row_span: 1,
                col_span: 1,
                paragraphs: Vec::new(),
            })),
            b"cellAddr" => {
                if let Some(Frame::Cell(cell)) = self.stack.last_mut()
                    && let (Some(col), Some(row)) = (attr_u16(e, b"colAddr"), attr_u16(e, b"rowAddr"))
                {
                    cell.address = Some((row, col));
                }
            },
            b"cellSpan" => {
                if let Some(Frame::Cell(cell)) = self.stack.last_mut() {
                    cell.col_span = attr_u16(e, b"colSpan").unwrap_or(1);
                    cell.row_span = attr_u16(e, b"rowSpan").unwrap_or(1);
                }
            },
            b"caption" => self.stack.push(Frame::Caption(Vec::new())),
            b"lineBreak" => self.inline_control(10, ControlClass::LineBreak),
            b"tab" => self.inline_control(9, ControlClass::Tab),
            b"nbSpace" => self.inline_control(30, ControlClass::Substitute(' ')),
            b"fwSpace" => self.inline_control(31, ControlClass::Substitute(' ')),
            b"hyphen" => self.inline_control(24, ControlClass::Substitute('-')),
            other => {
                if let Some(kind) = list_kind(other) {
                    self.stack.push(Frame::List(EmbeddedList {
                        kind,
                        paragraphs: Vec::new(),
                    }));
                }
            },
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.text_depth = self.text_depth.saturating_sub(1),
            b"p" => {
                if matches!(self.stack.last(), Some(Frame::Paragraph(_)))
                    && let Some(Frame::Paragraph(para)) = self.stack.pop()
                {
                    self.attach_paragraph(para);
                }
            },
            b"tbl" => {
                if matches!(self.stack.last(), Some(Frame::Table { .. }))
                    && let Some(Frame::Table {
                        rows,
                        cols,
                        cells,
                        caption,
                    }) = self.stack.pop()
                {
                    let (table, diagnostics) =
                        Table::from_cells_in(rows, cols, cells, caption, &mut self.grid_budget);
                    for diag in diagnostics {
                        warn!("{}: {}", self.part, diag);
                    }
                    self.attach_inline(Inline::Table(table));
                }
            },
            b"tc" => {
                if matches!(self.stack.last(), Some(Frame::Cell(_)))
                    && let Some(Frame::Cell(cell)) = self.stack.pop()
                {
                    match self.stack.last_mut() {
                        Some(Frame::Table { cells, .. }) => cells.push(cell),
                        _ => self.section.paragraphs.extend(cell.paragraphs),
                    }
                }
            },
            b"caption" => {
                if matches!(self.stack.last(), Some(Frame::Caption(_)))
                    && let Some(Frame::Caption(paragraphs)) = self.stack.pop()
                {
                    match self.stack.last_mut() {
                        Some(Frame::Table { caption, .. }) => caption.extend(paragraphs),
                        _ => self.section.paragraphs.extend(paragraphs),
                    }
                }
            },
            other if list_kind(other).is_some() => {
                if matches!(self.stack.last(), Some(Frame::List(_)))
                    && let Some(Frame::List(list)) = self.stack.pop()
                {
                    self.attach_inline(Inline::Embedded(list));
                }
            },
            _ => {},
        }
    }

    fn text(&mut self, text: &str) {
        if self.text_depth == 0 {
            return;
        }
        if let Some(Frame::Paragraph(para)) = self.stack.last_mut() {
            para.push_text(text);
        }
    }

    fn inline_control(&mut self, code: u16, class: ControlClass) {
        if self.text_depth == 0 {
            return;
        }
        if let Some(Frame::Paragraph(para)) = self.stack.last_mut() {
            para.push_class(code, class);
        }
    }

    fn attach_paragraph(&mut self, para: Paragraph) {
        match self.stack.last_mut() {
            Some(Frame::Cell(cell)) => cell.paragraphs.push(para),
            Some(Frame::Caption(paragraphs)) => paragraphs.push(para),
            Some(Frame::List(list)) => list.paragraphs.push(para),
            _ => self.section.paragraphs.push(para),
        }
    }

    /// Attach an object to the open paragraph, or to a paragraph of its own.
    fn attach_inline(&mut self, node: Inline) {
        if let Some(Frame::Paragraph(para)) = self.stack.last_mut() {
            para.children.push(node);
        } else {
            self.attach_paragraph(Paragraph {
                children: vec![node],
            });
        }
    }

    fn entity(&mut self, reference: &BytesRef<'_>) -> Result<()> {
        let resolved = match reference
            .resolve_char_ref()
            .map_err(|e| Error::Xml(format!("{}: {}", self.part, e)))?
        {
            Some(ch) => Some(ch.to_string()),
            None => {
                let name = reference
                    .decode()
                    .map_err(|e| Error::Xml(format!("{}: {}", self.part, e)))?;
                resolve_predefined_entity(&name).map(str::to_string)
            },
        };
        match resolved {
            Some(text) => self.text(&text),
            None => trace!("{}: unresolved entity reference", self.part),
        }
        Ok(())
    }

    fn finish(mut self) -> Section {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Paragraph(para) => self.attach_paragraph(para),
                Frame::Cell(PendingCell { paragraphs, .. })
                | Frame::Caption(paragraphs)
                | Frame::List(EmbeddedList { paragraphs, .. }) => {
                    self.section.paragraphs.extend(paragraphs)
                },
                Frame::Table {
                    rows,
                    cols,
                    cells,
                    caption,
                } => {
                    let (table, _) =
                        Table::from_cells_in(rows, cols, cells, caption, &mut self.grid_budget);
                    self.attach_inline(Inline::Table(table));
                },
            }
        }
        self.section
    }
}

/// Parse one section part into a [`Section`].
///
/// `part` names the part in errors and log messages. Padded table grids
/// are bounded by [`GridBudget::for_input`] of the part's length.
pub fn parse_section(part: &str, xml: &[u8]) -> Result<Section> {
    let mut reader = Reader::from_reader(xml);
    let mut parser = SectionParser::new(part, GridBudget::for_input(xml.len()));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.start(e),
            Ok(Event::Empty(ref e)) => {
                parser.start(e);
                parser.end(e.local_name().as_ref());
            },
            Ok(Event::End(ref e)) => parser.end(e.local_name().as_ref()),
            Ok(Event::Text(ref t)) => parser.text(&String::from_utf8_lossy(t)),
            Ok(Event::CData(ref t)) => parser.text(&String::from_utf8_lossy(t)),
            Ok(Event::GeneralRef(ref r)) => parser.entity(r)?,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!(
                    "{} at position {}: {}",
                    part,
                    reader.error_position(),
                    e
                )));
            },
            _ => {},
        }
        buf.clear();
    }

    Ok(parser.finish())
}
