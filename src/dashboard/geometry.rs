use serde::{Deserialize, Serialize};

/// Linear cell address, `row * cols + col`.
pub type CellIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn contains_cell(&self, cell: CellIndex) -> bool {
        cell < self.cell_count()
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Number of columns and rows a placed widget covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub col_span: usize,
    pub row_span: usize,
}

impl Span {
    pub const UNIT: Span = Span {
        col_span: 1,
        row_span: 1,
    };

    pub fn new(col_span: usize, row_span: usize) -> Self {
        Self { col_span, row_span }
    }

    pub fn is_valid(&self) -> bool {
        self.col_span >= 1 && self.row_span >= 1
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Rectangle of cells anchored at its top-left `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub row: usize,
    pub col: usize,
    pub span: Span,
}

impl CellRect {
    pub fn new(row: usize, col: usize, span: Span) -> Self {
        Self { row, col, span }
    }

    pub fn at(origin: CellIndex, span: Span, cols: usize) -> Self {
        let (row, col) = cell_to_row_col(origin, cols);
        Self { row, col, span }
    }

    pub fn row_end(&self) -> usize {
        self.row.saturating_add(self.span.row_span)
    }

    pub fn col_end(&self) -> usize {
        self.col.saturating_add(self.span.col_span)
    }

    pub fn fits_in(&self, grid: GridSize) -> bool {
        self.row < grid.rows
            && self.col < grid.cols
            && self.span.row_span <= grid.rows - self.row
            && self.span.col_span <= grid.cols - self.col
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row_end() && col >= self.col && col < self.col_end()
    }

    pub fn intersects(&self, other: &CellRect) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.col < other.col_end()
            && other.col < self.col_end()
    }

    /// Linear indices of every covered cell, in row-major order.
    pub fn cells(&self, cols: usize) -> Vec<CellIndex> {
        let mut cells = Vec::with_capacity(self.span.row_span.saturating_mul(self.span.col_span));
        for r in self.row..self.row_end() {
            for c in self.col..self.col_end() {
                cells.push(row_col_to_cell(r, c, cols));
            }
        }
        cells
    }
}

impl std::fmt::Display for CellRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}, col {}, span {}x{}",
            self.row, self.col, self.span.row_span, self.span.col_span
        )
    }
}

pub fn cell_to_row_col(index: CellIndex, cols: usize) -> (usize, usize) {
    (index / cols, index % cols)
}

pub fn row_col_to_cell(row: usize, col: usize, cols: usize) -> CellIndex {
    row * cols + col
}

pub fn covered_cells(origin: CellIndex, span: Span, cols: usize) -> Vec<CellIndex> {
    CellRect::at(origin, span, cols).cells(cols)
}
