//! Core abstraction traits for cell access and snapshot exchange.

use crate::error::SheetError;
use crate::id::{CellEntry, Shape};

/// Read-only, per-cell access to a sheet.
///
/// The search algorithms are written against this trait rather than
/// against the engine, so every cell they inspect goes through the
/// implementor's own locking discipline. Each call is independently
/// consistent; nothing is promised across calls.
pub trait CellReader: Send + Sync {
    /// Current row and column counts.
    fn shape(&self) -> Shape;

    /// Read the text at `(row, col)`.
    ///
    /// Returns [`SheetError::IndexOutOfRange`] if either index is outside
    /// the current shape.
    fn cell(&self, row: usize, col: usize) -> Result<String, SheetError>;
}

/// Producer side of the snapshot contract.
///
/// Implemented by the engine; consumed by the snapshot codec to write
/// the textual format.
pub trait SnapshotSource {
    /// The shape and every non-empty cell, read under one consistent
    /// acquisition so the pair describes a single instant.
    ///
    /// Entries are in row-major order.
    fn snapshot_cells(&self) -> (Shape, Vec<CellEntry>);
}

/// Consumer side of the snapshot contract.
pub trait SnapshotSink {
    /// Replace the whole sheet (contents and lock state) with `shape`
    /// and `cells`. Positions not mentioned become empty.
    ///
    /// Every entry is validated before anything is replaced; on error the
    /// previous contents are left untouched.
    fn load_snapshot(&self, shape: Shape, cells: Vec<CellEntry>) -> Result<(), SheetError>;
}
