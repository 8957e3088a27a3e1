/// Low-level writer for plain text output.
///
/// Output is built as a list of blocks joined by single newlines. Every
/// paragraph is one block; a table anchored in a paragraph splits it into the
/// text before the table, the table itself and the text after it.
use super::config::{TableStyle, TextOptions};
use crate::document::{Cell, Inline, Paragraph, Section, Table};

/// Minimum column width of a boxed table
const MIN_BOX_WIDTH: usize = 3;

pub struct TextWriter<'o> {
    blocks: Vec<String>,
    options: &'o TextOptions,
}

impl<'o> TextWriter<'o> {
    pub fn new(options: &'o TextOptions) -> Self {
        Self {
            blocks: Vec::new(),
            options,
        }
    }

    pub fn write_section(&mut self, section: &Section) {
        for para in &section.paragraphs {
            self.write_paragraph(para);
        }
    }

    pub fn write_paragraph(&mut self, para: &Paragraph) {
        let mut current = String::new();
        let mut split = false;

        for child in &para.children {
            match child {
                Inline::Run(run) => current.push_str(&run.text),
                Inline::Control(ctrl) => {
                    if let Some(ch) = ctrl.class.substitute() {
                        current.push(ch);
                    }
                },
                Inline::Table(table) => {
                    split = true;
                    self.flush(&mut current);
                    self.write_table(table);
                },
                Inline::Embedded(list) if self.options.includes(list.kind) => {
                    split = true;
                    self.flush(&mut current);
                    for inner in &list.paragraphs {
                        self.write_paragraph(inner);
                    }
                },
                Inline::Embedded(_) => {},
            }
        }

        if split {
            self.flush(&mut current);
        } else {
            self.blocks.push(current);
        }
    }

    /// Write a table block followed by its caption.
    pub fn write_table(&mut self, table: &Table) {
        if table.rows > 0 && table.cols > 0 {
            let block = match self.options.table_style {
                TableStyle::Delimited => self.delimited(table),
                TableStyle::Boxed => self.boxed(table),
            };
            self.blocks.push(block);
        }
        for para in &table.caption {
            self.write_paragraph(para);
        }
    }

    pub fn finish(self) -> String {
        self.blocks.join("\n")
    }

    fn flush(&mut self, current: &mut String) {
        if !current.is_empty() {
            self.blocks.push(std::mem::take(current));
        }
    }

    fn delimited(&self, table: &Table) -> String {
        table
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| self.cell_text(cell))
                    .collect::<Vec<_>>()
                    .join(&self.options.column_delimiter)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn boxed(&self, table: &Table) -> String {
        let cols = table.cols as usize;
        let grid: Vec<Vec<String>> = table
            .rows()
            .map(|row| row.iter().map(|cell| self.cell_text(cell)).collect())
            .collect();

        let mut widths = vec![MIN_BOX_WIDTH; cols];
        for (cell, text) in table.cells.iter().zip(grid.iter().flatten()) {
            if cell.covered {
                continue;
            }
            let len = text.chars().count();
            let span = cell.col_span.max(1) as usize;
            let share = if span == 1 { len } else { len / span };
            let first = cell.col as usize;
            for width in widths.iter_mut().skip(first).take(span) {
                *width = (*width).max(share);
            }
        }

        let rule = |left: char, mid: char, right: char| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(&mid.to_string()), right)
        };

        let mut lines = Vec::with_capacity(grid.len() * 2 + 1);
        lines.push(rule('┌', '┬', '┐'));
        for (r, row) in grid.iter().enumerate() {
            let padded: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, &w)| {
                    let pad = w.saturating_sub(text.chars().count());
                    format!("{}{}", text, " ".repeat(pad))
                })
                .collect();
            lines.push(format!("│ {} │", padded.join(" │ ")));
            if r + 1 < grid.len() {
                lines.push(rule('├', '┼', '┤'));
            }
        }
        lines.push(rule('└', '┴', '┘'));
        lines.join("\n")
    }

    /// Single-line text of a cell: whitespace collapsed, nested tables
    /// flattened row by row.
    fn cell_text(&self, cell: &Cell) -> String {
        if cell.covered {
            return String::new();
        }
        let mut raw = String::new();
        self.flatten_paragraphs(&cell.paragraphs, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn flatten_paragraphs(&self, paragraphs: &[Paragraph], out: &mut String) {
        for para in paragraphs {
            out.push(' ');
            for child in &para.children {
                match child {
                    Inline::Run(run) => out.push_str(&run.text),
                    Inline::Control(ctrl) => match ctrl.class.substitute() {
                        Some('\n' | '\t') => out.push(' '),
                        Some(ch) => out.push(ch),
                        None => {},
                    },
                    Inline::Table(table) => {
                        for cell in table.cells.iter().filter(|c| !c.covered) {
                            self.flatten_paragraphs(&cell.paragraphs, out);
                        }
                        self.flatten_paragraphs(&table.caption, out);
                        out.push(' ');
                    },
                    Inline::Embedded(list) if self.options.includes(list.kind) => {
                        self.flatten_paragraphs(&list.paragraphs, out);
                        out.push(' ');
                    },
                    Inline::Embedded(_) => {},
                }
            }
        }
    }
}
