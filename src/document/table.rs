//! Tables and grid normalization.

use super::Paragraph;

/// Largest grid a table may declare before it is sized from its cells.
const MAX_GRID_CELLS: usize = 1 << 20;

/// Padded grid positions a run of tables may still allocate.
///
/// One budget is shared by every table of a section, so a short record or
/// element stream cannot declare grids far larger than itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBudget {
    remaining: usize,
}

impl Default for GridBudget {
    fn default() -> Self {
        Self::new(MAX_GRID_CELLS)
    }
}

impl GridBudget {
    /// Smallest budget handed to any section.
    pub const MIN_CELLS: usize = 1 << 16;
    /// Grid positions allowed per byte of section data.
    pub const CELLS_PER_BYTE: usize = 4;

    #[inline]
    pub fn new(cells: usize) -> Self {
        Self { remaining: cells }
    }

    /// Budget for a section of `len` bytes.
    pub fn for_input(len: usize) -> Self {
        Self::new(len.saturating_mul(Self::CELLS_PER_BYTE).max(Self::MIN_CELLS))
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn charge(&mut self, cells: usize) {
        self.remaining = self.remaining.saturating_sub(cells);
    }
}

/// One grid position of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
    pub row_span: u16,
    pub col_span: u16,
    /// Position hidden by a neighbouring merged cell
    pub covered: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    /// Placeholder for a position covered by a merged cell.
    pub fn covered(row: u16, col: u16) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            covered: true,
            paragraphs: Vec::new(),
        }
    }

    fn empty(row: u16, col: u16) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            covered: false,
            paragraphs: Vec::new(),
        }
    }
}

/// A table with exactly `rows * cols` cells in row-major order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: u16,
    pub cols: u16,
    pub cells: Vec<Cell>,
    pub caption: Vec<Paragraph>,
}

/// A cell as read from the source, before it is placed on the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingCell {
    /// `(row, col)` when the source states it
    pub address: Option<(u16, u16)>,
    pub row_span: u16,
    pub col_span: u16,
    pub paragraphs: Vec<Paragraph>,
}

/// Something that did not fit while normalizing a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridDiagnostic {
    /// The declared size was unusable and was derived from the cells
    Resized { rows: u16, cols: u16 },
    /// A cell's address was outside the grid or already taken
    Misplaced { index: usize },
    /// No free position was left; the cell's text went to the last cell
    Overflow { index: usize },
    /// Positions that no cell covered
    MissingCells(usize),
}

impl std::fmt::Display for GridDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridDiagnostic::Resized { rows, cols } => {
                write!(f, "table size taken from cells: {}x{}", rows, cols)
            },
            GridDiagnostic::Misplaced { index } => {
                write!(f, "cell {} moved to the next free position", index)
            },
            GridDiagnostic::Overflow { index } => {
                write!(f, "cell {} does not fit in the table", index)
            },
            GridDiagnostic::MissingCells(n) => write!(f, "table truncated: {} cells missing", n),
        }
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Free,
    Origin(usize),
    Covered,
}

impl Table {
    /// A 0x0 table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Place source cells on a `rows x cols` grid.
    ///
    /// Cells go to their stated address when it is inside the grid and
    /// free, otherwise to the next free position in row-major order.
    /// Positions spanned by a merged cell become [`Cell::covered`], and
    /// positions nobody claimed become empty cells, so the result always
    /// holds `rows * cols` cells.
    pub fn from_cells(
        rows: u16,
        cols: u16,
        pending: Vec<PendingCell>,
        caption: Vec<Paragraph>,
    ) -> (Table, Vec<GridDiagnostic>) {
        Self::from_cells_in(rows, cols, pending, caption, &mut GridBudget::default())
    }

    /// [`from_cells`](Self::from_cells), charging the grid to `budget`.
    ///
    /// A declared size larger than what is left of the budget is replaced
    /// by the size the cells themselves imply.
    pub fn from_cells_in(
        rows: u16,
        cols: u16,
        pending: Vec<PendingCell>,
        caption: Vec<Paragraph>,
        budget: &mut GridBudget,
    ) -> (Table, Vec<GridDiagnostic>) {
        let mut diagnostics = Vec::new();
        let limit = budget.remaining().min(MAX_GRID_CELLS);
        let declared = rows > 0 && cols > 0;
        let (rows, cols) = if declared && rows as usize * cols as usize <= limit {
            (rows, cols)
        } else if pending.is_empty() {
            if declared {
                diagnostics.push(GridDiagnostic::Resized { rows: 0, cols: 0 });
            }
            (0, 0)
        } else {
            let (r, c) = infer_size(&pending, limit.max(pending.len()));
            diagnostics.push(GridDiagnostic::Resized { rows: r, cols: c });
            (r, c)
        };
        budget.charge(rows as usize * cols as usize);

        let width = cols as usize;
        let mut slots = vec![Slot::Free; rows as usize * width];
        let mut placed: Vec<Cell> = Vec::with_capacity(pending.len());
        let mut cursor = 0;

        for (index, cell) in pending.into_iter().enumerate() {
            let wanted = cell
                .address
                .filter(|&(r, c)| r < rows && c < cols)
                .map(|(r, c)| r as usize * width + c as usize)
                .filter(|&pos| matches!(slots[pos], Slot::Free));

            let pos = match wanted {
                Some(pos) => Some(pos),
                None => {
                    while cursor < slots.len() && !matches!(slots[cursor], Slot::Free) {
                        cursor += 1;
                    }
                    if cell.address.is_some() && cursor < slots.len() {
                        diagnostics.push(GridDiagnostic::Misplaced { index });
                    }
                    (cursor < slots.len()).then_some(cursor)
                },
            };

            let Some(pos) = pos else {
                diagnostics.push(GridDiagnostic::Overflow { index });
                if let Some(last) = placed.last_mut() {
                    last.paragraphs.extend(cell.paragraphs);
                }
                continue;
            };

            let row = (pos / width) as u16;
            let col = (pos % width) as u16;
            let row_span = cell.row_span.clamp(1, rows - row);
            let col_span = cell.col_span.clamp(1, cols - col);
            for r in row..row + row_span {
                for c in col..col + col_span {
                    let p = r as usize * width + c as usize;
                    if matches!(slots[p], Slot::Free) {
                        slots[p] = Slot::Covered;
                    }
                }
            }
            slots[pos] = Slot::Origin(placed.len());
            placed.push(Cell {
                row,
                col,
                row_span,
                col_span,
                covered: false,
                paragraphs: cell.paragraphs,
            });
        }

        let missing = slots.iter().filter(|s| matches!(s, Slot::Free)).count();
        if missing > 0 {
            diagnostics.push(GridDiagnostic::MissingCells(missing));
        }

        let mut cells: Vec<Option<Cell>> = placed.into_iter().map(Some).collect();
        let grid = slots
            .iter()
            .enumerate()
            .map(|(pos, slot)| {
                let (row, col) = ((pos / width) as u16, (pos % width) as u16);
                match *slot {
                    Slot::Origin(idx) => cells[idx].take().unwrap_or_else(|| Cell::empty(row, col)),
                    Slot::Covered => Cell::covered(row, col),
                    Slot::Free => Cell::empty(row, col),
                }
            })
            .collect();

        (
            Table {
                rows,
                cols,
                cells: grid,
                caption,
            },
            diagnostics,
        )
    }

    /// Cell at a grid position.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }
}

/// Grid size implied by cell addresses and spans; cells without an address
/// are stacked one per row below the addressed ones. The grid never holds
/// more than `cap` positions.
fn infer_size(pending: &[PendingCell], cap: usize) -> (u16, u16) {
    let mut rows = 0u32;
    let mut cols = 1u32;
    let mut loose = 0u32;
    for cell in pending {
        match cell.address {
            Some((r, c)) => {
                rows = rows.max(r as u32 + cell.row_span.max(1) as u32);
                cols = cols.max(c as u32 + cell.col_span.max(1) as u32);
            },
            None => loose += 1,
        }
    }
    let rows = (rows + loose.div_ceil(cols)).max(1);
    let cap = cap.clamp(1, MAX_GRID_CELLS) as u32;
    let cols = cols.min(cap).min(u16::MAX as u32);
    let rows = rows.min((cap / cols).max(1)).min(u16::MAX as u32);
    (rows as u16, cols as u16)
}
