//! Test utilities and mock types for Tessera development.
//!
//! Provides a mock [`CellReader`] ([`MockGrid`]) for exercising the search
//! algorithms without the engine, plus snapshot fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use tessera_core::{Axis, CellReader, Shape, SheetError};

/// Mock implementation of [`CellReader`].
///
/// Backed by a plain `Vec<Vec<String>>` with no locking. Counts every
/// [`cell`](CellReader::cell) call so tests can assert that an algorithm
/// reads through the trait.
pub struct MockGrid {
    rows: Vec<Vec<String>>,
    cols: usize,
    reads: AtomicUsize,
}

impl MockGrid {
    /// An all-empty `rows x cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![String::new(); cols]; rows],
            cols,
            reads: AtomicUsize::new(0),
        }
    }

    /// Build from string slices. Every row must have the same length.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "MockGrid rows must be rectangular"
        );
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            cols,
            reads: AtomicUsize::new(0),
        }
    }

    /// Overwrite one cell.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.rows[row][col] = value.into();
    }

    /// Number of `cell` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl CellReader for MockGrid {
    fn shape(&self) -> Shape {
        Shape::new(self.rows.len(), self.cols)
    }

    fn cell(&self, row: usize, col: usize) -> Result<String, SheetError> {
        SheetError::check_index(Axis::Row, row, self.rows.len())?;
        SheetError::check_index(Axis::Col, col, self.cols)?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.rows[row][col].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_grid_counts_reads_and_checks_bounds() {
        let mut grid = MockGrid::new(2, 2);
        grid.set(1, 0, "v");
        assert_eq!(grid.cell(1, 0).unwrap(), "v");
        assert!(grid.cell(2, 0).is_err());
        assert_eq!(grid.reads(), 1);
        assert_eq!(grid.shape(), Shape::new(2, 2));
    }
}
