use serde::{Deserialize, Serialize};

/// A single cell of a raw statement table, as handed over by the loader.
///
/// The loader is responsible for typing cells as text, number, or blank;
/// this crate makes no assumption about the source file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Blank,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// An ordered 2-D grid of cells for one financial statement.
///
/// Immutable once handed to the resolver; rows may be ragged, and reads past
/// the end of a row behave as blank cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStatementTable {
    rows: Vec<Vec<Cell>>,
}

impl RawStatementTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a table from rows of anything convertible to a `Cell`.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row in the grid. Ragged rows are tolerated.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns the cell at (row, col), treating out-of-range reads as blank.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const BLANK: Cell = Cell::Blank;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&BLANK)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}
