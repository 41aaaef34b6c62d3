//! Positions, shapes, and the [`Axis`] discriminator.

use std::fmt;

/// One of the two dimensions of a sheet.
///
/// Each individual row and each individual column is one axis *instance*
/// and carries its own lock state in the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The row dimension.
    Row,
    /// The column dimension.
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Col => write!(f, "col"),
        }
    }
}

/// Position of a cell in the sheet.
///
/// Ordered row-major, so sorting a set of positions yields the same
/// order a full scan visits them in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl CellPos {
    /// Create a position from a row and column index.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row and column counts of a sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl Shape {
    /// Create a shape from row and column counts.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells, or `None` if the product overflows.
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Whether the shape has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether `pos` lies inside the shape.
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A single non-empty cell, as exchanged with the snapshot codec.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellEntry {
    /// Where the value lives.
    pub pos: CellPos,
    /// The cell text. Never empty when produced by a snapshot source.
    pub value: String,
}

impl CellEntry {
    /// Create an entry for `value` at `(row, col)`.
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Self {
            pos: CellPos::new(row, col),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_pos_orders_row_major() {
        let mut positions = vec![
            CellPos::new(1, 0),
            CellPos::new(0, 2),
            CellPos::new(0, 1),
            CellPos::new(1, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                CellPos::new(0, 1),
                CellPos::new(0, 2),
                CellPos::new(1, 0),
                CellPos::new(1, 1),
            ]
        );
    }

    #[test]
    fn shape_contains() {
        let shape = Shape::new(3, 5);
        assert!(shape.contains(CellPos::new(2, 4)));
        assert!(!shape.contains(CellPos::new(3, 0)));
        assert!(!shape.contains(CellPos::new(0, 5)));
        assert_eq!(shape.checked_cell_count(), Some(15));
        assert!(!shape.is_empty());
        assert!(Shape::new(0, 4).is_empty());
    }

    #[test]
    fn shape_overflow_is_detected() {
        let shape = Shape::new(usize::MAX, 2);
        assert_eq!(shape.checked_cell_count(), None);
    }

    #[test]
    fn axis_display() {
        assert_eq!(Axis::Row.to_string(), "row");
        assert_eq!(Axis::Col.to_string(), "col");
    }
}
