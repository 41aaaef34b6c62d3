//! Error types for sheet operations.
//!
//! Index violations are contract errors reported to the caller; they are
//! never clamped. Lock-protocol violations are engine bugs and panic
//! instead of surfacing here.

use std::error::Error;
use std::fmt;

use crate::id::{Axis, CellPos, Shape};

/// Errors returned by sheet operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetError {
    /// A row or column index is outside `[0, len)`.
    IndexOutOfRange {
        /// Which axis the index addresses.
        axis: Axis,
        /// The offending index.
        index: usize,
        /// Number of valid indices on that axis at the time of the call.
        len: usize,
    },
    /// A snapshot entry lies outside the shape it was loaded with.
    CellOutOfRange {
        /// The offending position.
        pos: CellPos,
        /// The declared shape.
        shape: Shape,
    },
    /// A bulk overwrite matrix is not rectangular.
    RaggedRows {
        /// First row whose length differs from row 0.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A sheet must have at least one row and one column.
    EmptySheet,
    /// `rows * cols` exceeds the largest sheet the engine will allocate.
    TooLarge {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
}

impl SheetError {
    /// Check `index` against `len` on `axis`.
    pub fn check_index(axis: Axis, index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { axis, index, len })
        }
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { axis, index, len } => {
                write!(f, "{axis} index {index} out of range (len {len})")
            }
            Self::CellOutOfRange { pos, shape } => {
                write!(f, "cell {pos} outside sheet of shape {shape}")
            }
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected} like row 0"
            ),
            Self::EmptySheet => write!(f, "sheet must have at least one row and one column"),
            Self::TooLarge { rows, cols } => {
                write!(f, "sheet of {rows}x{cols} cells is too large")
            }
        }
    }
}

impl Error for SheetError {}
