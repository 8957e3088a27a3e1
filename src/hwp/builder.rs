//! Rebuilds the document tree of one body section from its records.
//!
//! Records arrive in pre-order with an explicit nesting level. The builder
//! keeps a stack of open frames; before a record at level `R` is handled,
//! every frame whose children live deeper than `R` is closed. Closing a frame
//! hands its content to the frame below it, so a table is attached to its
//! paragraph when the first record outside the table arrives.

use super::control::{ControlKind, control_kind};
use super::para_text::decode_para_text;
use super::record::{HWPTAG_CTRL_HEADER, HwpTag, Record};
use crate::common::Result;
use crate::common::binary::{read_u16_le, read_u32_le};
use crate::document::{
    ControlId, EmbeddedList, GridBudget, GridDiagnostic, Inline, ListKind, Paragraph, PendingCell,
    Section, Table,
};
use log::trace;
use smallvec::SmallVec;

/// Byte offset of the cell address in a cell's `LIST_HEADER` payload
const CELL_ADDRESS_OFFSET: usize = 8;
const CELL_ATTRS_LEN: usize = CELL_ADDRESS_OFFSET + 8;

/// A record that did not fit the nesting of the records before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureError {
    /// Byte offset of the record in the decompressed stream
    pub offset: usize,
    pub level: u16,
    pub tag: u16,
    pub reason: String,
}

impl std::fmt::Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {:#05x} at level {}: {}",
            self.tag, self.level, self.reason
        )
    }
}

/// A built section plus everything that had to be repaired on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSection {
    pub section: Section,
    pub diagnostics: Vec<StructureError>,
}

/// What a paragraph list under a control becomes.
#[derive(Debug)]
enum ListRole {
    Caption,
    Cell {
        address: Option<(u16, u16)>,
        row_span: u16,
        col_span: u16,
    },
    Embedded,
}

#[derive(Debug)]
struct ControlFrame {
    level: u16,
    offset: usize,
    id: ControlId,
    kind: ControlKind,
    /// Rows and columns once the `TABLE` record was seen
    dims: Option<(u16, u16)>,
    caption: Vec<Paragraph>,
    cells: Vec<PendingCell>,
    paragraphs: Vec<Paragraph>,
}

impl ControlFrame {
    fn attach(&mut self, role: ListRole, paragraphs: Vec<Paragraph>) {
        match role {
            ListRole::Caption => self.caption.extend(paragraphs),
            ListRole::Cell {
                address,
                row_span,
                col_span,
            } => self.cells.push(PendingCell {
                address,
                row_span,
                col_span,
                paragraphs,
            }),
            ListRole::Embedded => self.paragraphs.extend(paragraphs),
        }
    }

    fn finish(self, budget: &mut GridBudget) -> (Option<Inline>, Vec<GridDiagnostic>) {
        match self.kind {
            ControlKind::Table => {
                let (rows, cols) = self.dims.unwrap_or((0, 0));
                let (table, diagnostics) =
                    Table::from_cells_in(rows, cols, self.cells, self.caption, budget);
                (Some(Inline::Table(table)), diagnostics)
            },
            ControlKind::List(kind) => (
                Some(Inline::Embedded(EmbeddedList {
                    kind,
                    paragraphs: self.paragraphs,
                })),
                Vec::new(),
            ),
            ControlKind::Opaque if self.paragraphs.is_empty() => (None, Vec::new()),
            ControlKind::Opaque => (
                Some(Inline::Embedded(EmbeddedList {
                    kind: ListKind::Other,
                    paragraphs: self.paragraphs,
                })),
                Vec::new(),
            ),
        }
    }
}

#[derive(Debug)]
enum Frame {
    Paragraph {
        level: u16,
        para: Paragraph,
    },
    Control(Box<ControlFrame>),
    List {
        level: u16,
        role: ListRole,
        paragraphs: Vec<Paragraph>,
    },
}

impl Frame {
    /// Lowest level at which records still belong to this frame.
    fn child_level(&self) -> u16 {
        match self {
            Frame::Paragraph { level, .. } => level + 1,
            Frame::Control(ctrl) => ctrl.level + 1,
            Frame::List { level, .. } => *level,
        }
    }
}

/// Incremental tree builder for one `BodyText/Section*` stream.
#[derive(Debug, Default)]
pub struct SectionBuilder {
    stack: SmallVec<[Frame; 8]>,
    /// Level of top-level paragraphs
    root_level: u16,
    section: Section,
    diagnostics: Vec<StructureError>,
    /// Padded cells the section's tables may still allocate
    grid_budget: GridBudget,
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share `budget` between every table of the section.
    pub fn with_grid_budget(mut self, budget: GridBudget) -> Self {
        self.grid_budget = budget;
        self
    }

    /// Build a section from a record sequence.
    ///
    /// A tokenizer error aborts the build; structure problems are repaired
    /// and reported in [`BuiltSection::diagnostics`].
    pub fn build<'a, I>(records: I) -> Result<BuiltSection>
    where
        I: IntoIterator<Item = Result<Record<'a>>>,
    {
        Self::new().build_from(records)
    }

    /// Like [`build`](Self::build), starting from a configured builder.
    pub fn build_from<'a, I>(mut self, records: I) -> Result<BuiltSection>
    where
        I: IntoIterator<Item = Result<Record<'a>>>,
    {
        for record in records {
            self.push(&record?);
        }
        Ok(self.finish())
    }

    /// Feed the next record.
    pub fn push(&mut self, record: &Record<'_>) {
        self.close_deeper_than(record.level);
        match record.tag() {
            HwpTag::ParaHeader => self.open_paragraph(record),
            HwpTag::ParaText => self.para_text(record),
            HwpTag::CtrlHeader => self.open_control(record),
            HwpTag::Table => self.table(record),
            HwpTag::ListHeader => self.open_list(record),
            tag => trace!(
                "skipping {:?} record at offset {} (level {})",
                tag, record.offset, record.level
            ),
        }
    }

    /// Close every open frame and return the result.
    pub fn finish(mut self) -> BuiltSection {
        self.close_all();
        BuiltSection {
            section: self.section,
            diagnostics: self.diagnostics,
        }
    }

    fn close_deeper_than(&mut self, level: u16) {
        while self.stack.last().is_some_and(|f| f.child_level() > level) {
            self.close_top();
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph { para, .. } => match self.stack.last_mut() {
                Some(Frame::List { paragraphs, .. }) => paragraphs.push(para),
                _ => self.section.paragraphs.push(para),
            },
            Frame::List {
                role, paragraphs, ..
            } => match self.stack.last_mut() {
                Some(Frame::Control(ctrl)) => ctrl.attach(role, paragraphs),
                _ => self.section.paragraphs.extend(paragraphs),
            },
            Frame::Control(ctrl) => {
                let (id, level, offset) = (ctrl.id, ctrl.level, ctrl.offset);
                let (node, grid) = ctrl.finish(&mut self.grid_budget);
                self.diagnostics
                    .extend(grid.into_iter().map(|d| StructureError {
                        offset,
                        level,
                        tag: HWPTAG_CTRL_HEADER,
                        reason: d.to_string(),
                    }));
                let Some(node) = node else {
                    return;
                };
                match self.stack.last_mut() {
                    Some(Frame::Paragraph { para, .. }) => {
                        para.resolve_anchor(id, node);
                    },
                    _ => self.section.paragraphs.push(Paragraph {
                        children: vec![node],
                    }),
                }
            },
        }
    }

    /// Record a structure error and restart at `root_level`, keeping
    /// everything built so far.
    fn recover(&mut self, record: &Record<'_>, reason: &str, root_level: u16) {
        self.diagnostics.push(StructureError {
            offset: record.offset,
            level: record.level,
            tag: record.tag_id,
            reason: reason.to_string(),
        });
        self.close_all();
        self.root_level = root_level;
    }

    /// Close a paragraph list at exactly `level`; `TABLE` and `LIST_HEADER`
    /// records are its siblings, not its children.
    fn close_sibling_list(&mut self, level: u16) {
        if matches!(self.stack.last(), Some(Frame::List { level: l, .. }) if *l == level) {
            self.close_top();
        }
    }

    fn open_paragraph(&mut self, record: &Record<'_>) {
        let level = record.level;
        let fits = match self.stack.last() {
            None => level == self.root_level,
            Some(Frame::List { level: l, .. }) => *l == level,
            Some(_) => false,
        };
        if !fits {
            self.recover(record, "paragraph outside a paragraph list", level);
        }
        self.stack.push(Frame::Paragraph {
            level,
            para: Paragraph::new(),
        });
    }

    /// Open a paragraph for content that arrived without one.
    fn open_implicit_paragraph(&mut self, record: &Record<'_>, reason: &str) {
        let level = record.level.saturating_sub(1);
        self.recover(record, reason, level);
        self.stack.push(Frame::Paragraph {
            level,
            para: Paragraph::new(),
        });
    }

    fn para_text(&mut self, record: &Record<'_>) {
        if !matches!(self.stack.last(), Some(Frame::Paragraph { .. })) {
            self.open_implicit_paragraph(record, "paragraph text without a paragraph header");
        }
        if let Some(Frame::Paragraph { para, .. }) = self.stack.last_mut() {
            decode_para_text(record.data, para);
        }
    }

    fn open_control(&mut self, record: &Record<'_>) {
        if !matches!(self.stack.last(), Some(Frame::Paragraph { .. })) {
            self.open_implicit_paragraph(record, "control outside a paragraph");
        }
        let id = ControlId(read_u32_le(record.data, 0).unwrap_or(0));
        let kind = control_kind(id);
        trace!("control '{}' ({:?}) at offset {}", id, kind, record.offset);
        self.stack.push(Frame::Control(Box::new(ControlFrame {
            level: record.level,
            offset: record.offset,
            id,
            kind,
            dims: None,
            caption: Vec::new(),
            cells: Vec::new(),
            paragraphs: Vec::new(),
        })));
    }

    fn table(&mut self, record: &Record<'_>) {
        self.close_sibling_list(record.level);
        let Some(Frame::Control(ctrl)) = self.stack.last_mut() else {
            self.recover(record, "table outside a control", record.level);
            return;
        };
        if ctrl.kind != ControlKind::Table {
            trace!("table record under control '{}' ignored", ctrl.id);
            return;
        }
        let rows = read_u16_le(record.data, 4).unwrap_or(0);
        let cols = read_u16_le(record.data, 6).unwrap_or(0);
        ctrl.dims = Some((rows, cols));
    }

    fn open_list(&mut self, record: &Record<'_>) {
        self.close_sibling_list(record.level);
        let Some(Frame::Control(ctrl)) = self.stack.last() else {
            self.recover(record, "paragraph list outside a control", record.level);
            return;
        };
        let role = match (ctrl.kind, ctrl.dims) {
            (ControlKind::Table, None) => ListRole::Caption,
            (ControlKind::Table, Some(_)) => cell_role(record.data),
            _ => ListRole::Embedded,
        };
        self.stack.push(Frame::List {
            level: record.level,
            role,
            paragraphs: Vec::new(),
        });
    }
}

fn cell_role(data: &[u8]) -> ListRole {
    if data.len() < CELL_ATTRS_LEN {
        return ListRole::Cell {
            address: None,
            row_span: 1,
            col_span: 1,
        };
    }
    let field = |i: usize| read_u16_le(data, CELL_ADDRESS_OFFSET + i * 2).unwrap_or(0);
    ListRole::Cell {
        address: Some((field(1), field(0))),
        row_span: field(3),
        col_span: field(2),
    }
}
