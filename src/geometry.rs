use serde::{Deserialize, Serialize};

/// Resolved rectangle for one cell, in 1-based grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub col_start: u16,
    pub col_span: u16,
    pub row_start: u16,
    pub row_span: u16,
}

impl Placement {
    pub const fn new(col_start: u16, col_span: u16, row_start: u16, row_span: u16) -> Self {
        Self {
            col_start,
            col_span,
            row_start,
            row_span,
        }
    }

    /// Last column covered (inclusive).
    pub fn col_end(&self) -> u16 {
        self.col_start.saturating_add(self.col_span).saturating_sub(1)
    }

    /// Last row covered (inclusive).
    pub fn row_end(&self) -> u16 {
        self.row_start.saturating_add(self.row_span).saturating_sub(1)
    }

    pub fn same_origin(&self, other: &Placement) -> bool {
        self.col_start == other.col_start && self.row_start == other.row_start
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.col_start <= other.col_end()
            && other.col_start <= self.col_end()
            && self.row_start <= other.row_end()
            && other.row_start <= self.row_end()
    }

    /// Unit cells covered, as `(row, col)` pairs, row-major.
    pub fn units(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        (self.row_start..=self.row_end())
            .flat_map(move |row| (self.col_start..=self.col_end()).map(move |col| (row, col)))
    }
}

/// Column/row span pair used for size overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub cols: u16,
    pub rows: u16,
}

impl Span {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Clamp the column span to `columns`, never below one.
    pub fn clamp_cols(self, columns: u16) -> Self {
        Self {
            cols: self.cols.min(columns).max(1),
            rows: self.rows.max(1),
        }
    }
}
