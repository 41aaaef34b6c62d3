//! The shared sheet: grid storage, cell access, and structural edits.
//!
//! Every public operation funnels through the per-axis lock tables in
//! [`crate::axis`] before touching cell storage.
//!
//! # Lock order
//!
//! ```text
//! growth mutex (row, then col) -> layout RwLock -> row gates -> col gates -> row storage
//! ```
//!
//! The layout lock is taken shared by every operation and exclusively only
//! to change the shape. Row storage locks are leaves: they are held for the
//! memory access alone, never across a gate wait, and always in ascending
//! row order when more than one is held.

use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tessera_core::{
    Axis, CellEntry, CellPos, CellReader, Shape, SheetError, SnapshotSink, SnapshotSource,
};

use crate::axis::AxisLocks;
use crate::config::{validate_shape, ConfigError, SheetConfig};
use crate::search;

// ── Layout ─────────────────────────────────────────────────────────

/// Axis lock tables plus row-major cell storage.
///
/// `rows.len() == cells.len()` and every row holds `cols.len()` cells.
struct Layout {
    rows: AxisLocks,
    cols: AxisLocks,
    cells: Vec<RwLock<Vec<String>>>,
}

impl Layout {
    fn empty(shape: Shape) -> Self {
        Self::from_rows(vec![vec![String::new(); shape.cols]; shape.rows], shape.cols)
    }

    /// Fresh lock state over `rows`, each of which has `cols` cells.
    fn from_rows(rows: Vec<Vec<String>>, cols: usize) -> Self {
        Self {
            rows: AxisLocks::new(Axis::Row, rows.len()),
            cols: AxisLocks::new(Axis::Col, cols),
            cells: rows.into_iter().map(RwLock::new).collect(),
        }
    }

    fn shape(&self) -> Shape {
        Shape::new(self.rows.len(), self.cols.len())
    }

    fn check(&self, row: usize, col: usize) -> Result<(), SheetError> {
        SheetError::check_index(Axis::Row, row, self.rows.len())?;
        SheetError::check_index(Axis::Col, col, self.cols.len())
    }
}

// ── Sheet ──────────────────────────────────────────────────────────

/// A grid of text cells shared by many threads.
///
/// All operations take `&self`; share the sheet with `Arc<Sheet>`.
/// Reads of a row or column run in parallel with each other, and cells in
/// disjoint rows and columns are written in parallel. A write excludes
/// every other access to its whole row and its whole column.
pub struct Sheet {
    layout: RwLock<Layout>,
    row_growth: Mutex<()>,
    col_growth: Mutex<()>,
}

// Compile-time assertion: Sheet must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Sheet>();
};

impl Sheet {
    /// Create an all-empty sheet from a validated config.
    pub fn new(config: SheetConfig) -> Result<Self, ConfigError> {
        let shape = config.validate()?;
        tracing::debug!("creating sheet of shape {}", shape);
        Ok(Self::from_layout(Layout::empty(shape)))
    }

    /// Create an all-empty `rows x cols` sheet.
    pub fn with_shape(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        Self::new(SheetConfig::new(rows, cols))
    }

    fn from_layout(layout: Layout) -> Self {
        Self {
            layout: RwLock::new(layout),
            row_growth: Mutex::new(()),
            col_growth: Mutex::new(()),
        }
    }

    /// Current row and column counts.
    pub fn shape(&self) -> Shape {
        self.read_layout().shape()
    }

    // ── Cell access ────────────────────────────────────────────────

    /// Read the text at `(row, col)`.
    ///
    /// Joins the reader cohorts of `row` and then `col`; blocks while a
    /// writer or structural edit holds either.
    pub fn get(&self, row: usize, col: usize) -> Result<String, SheetError> {
        let layout = self.read_layout();
        layout.check(row, col)?;
        let _row = layout.rows.begin_read(row)?;
        let _col = layout.cols.begin_read(col)?;
        let value = read_row(&layout.cells[row])[col].clone();
        tracing::trace!("get ({}, {})", row, col);
        Ok(value)
    }

    /// Overwrite the text at `(row, col)`.
    ///
    /// Holds `row` and `col` exclusively for the duration, so every other
    /// access to that row or column waits.
    pub fn set(&self, row: usize, col: usize, value: impl Into<String>) -> Result<(), SheetError> {
        let value = value.into();
        let layout = self.read_layout();
        layout.check(row, col)?;
        let _row = layout.rows.acquire_exclusive(row)?;
        let _col = layout.cols.acquire_exclusive(col)?;
        write_row(&layout.cells[row])[col] = value;
        tracing::trace!("set ({}, {})", row, col);
        Ok(())
    }

    // ── Structural operations ──────────────────────────────────────

    /// Swap the contents of two rows. Equal indices are a no-op.
    pub fn exchange_rows(&self, r1: usize, r2: usize) -> Result<(), SheetError> {
        let layout = self.read_layout();
        let _guards = layout.rows.acquire_exclusive_many(&[r1, r2])?;
        if r1 == r2 {
            return Ok(());
        }
        let (lo, hi) = (r1.min(r2), r1.max(r2));
        let mut upper = write_row(&layout.cells[lo]);
        let mut lower = write_row(&layout.cells[hi]);
        mem::swap(&mut *upper, &mut *lower);
        tracing::debug!("exchanged rows {} and {}", r1, r2);
        Ok(())
    }

    /// Swap the contents of two columns. Equal indices are a no-op.
    ///
    /// Locks the storage of every row, ascending, so the swap is atomic
    /// with respect to a concurrent row exchange.
    pub fn exchange_cols(&self, c1: usize, c2: usize) -> Result<(), SheetError> {
        let layout = self.read_layout();
        let _guards = layout.cols.acquire_exclusive_many(&[c1, c2])?;
        if c1 == c2 {
            return Ok(());
        }
        let mut rows: Vec<_> = layout.cells.iter().map(write_row).collect();
        for row in &mut rows {
            row.swap(c1, c2);
        }
        tracing::debug!("exchanged cols {} and {}", c1, c2);
        Ok(())
    }

    /// Insert an empty row directly after `row` and return its index.
    ///
    /// The row is appended and then walked down to `row + 1` by adjacent
    /// exchanges, so the cost is linear in the number of rows below the
    /// insertion point. Rows after `row` shift down by one.
    pub fn insert_row_after(&self, row: usize) -> Result<usize, SheetError> {
        let _growth = lock(&self.row_growth);
        let appended = {
            let mut guard = self.write_layout();
            let layout = &mut *guard;
            SheetError::check_index(Axis::Row, row, layout.rows.len())?;
            let index = layout.rows.push();
            layout
                .cells
                .push(RwLock::new(vec![String::new(); layout.cols.len()]));
            index
        };
        for r in (row + 1..appended).rev() {
            self.exchange_rows(r, r + 1)?;
        }
        tracing::debug!("inserted row {} ({} exchanges)", row + 1, appended - row - 1);
        Ok(row + 1)
    }

    /// Insert an empty column directly after `col` and return its index.
    ///
    /// Mirrors [`insert_row_after`](Self::insert_row_after) over columns.
    pub fn insert_col_after(&self, col: usize) -> Result<usize, SheetError> {
        let _growth = lock(&self.col_growth);
        let appended = {
            let mut guard = self.write_layout();
            let layout = &mut *guard;
            SheetError::check_index(Axis::Col, col, layout.cols.len())?;
            let index = layout.cols.push();
            for row in &mut layout.cells {
                row.get_mut()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(String::new());
            }
            index
        };
        for c in (col + 1..appended).rev() {
            self.exchange_cols(c, c + 1)?;
        }
        tracing::debug!("inserted col {} ({} exchanges)", col + 1, appended - col - 1);
        Ok(col + 1)
    }

    // ── Search ─────────────────────────────────────────────────────

    /// First cell equal to `value`, row-major. See [`search::search_string`].
    pub fn search_string(&self, value: &str) -> Result<Option<CellPos>, SheetError> {
        search::search_string(self, value)
    }

    /// Leftmost column of `row` equal to `value`.
    pub fn search_in_row(&self, row: usize, value: &str) -> Result<Option<usize>, SheetError> {
        search::search_in_row(self, row, value)
    }

    /// Topmost row of `col` equal to `value`.
    pub fn search_in_col(&self, col: usize, value: &str) -> Result<Option<usize>, SheetError> {
        search::search_in_col(self, col, value)
    }

    /// First match in an inclusive rectangle with clamped bounds.
    /// See [`search::search_in_range`].
    pub fn search_in_range(
        &self,
        r1: i64,
        r2: i64,
        c1: i64,
        c2: i64,
        value: &str,
    ) -> Result<Option<CellPos>, SheetError> {
        search::search_in_range(self, r1, r2, c1, c2, value)
    }

    // ── Bulk access ────────────────────────────────────────────────

    /// Every cell, row-major, read under one consistent acquisition.
    ///
    /// Joins the reader cohort of every row and then every column, so no
    /// write or structural edit can interleave with the read.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let layout = self.read_layout();
        let _rows = layout.rows.begin_read_all();
        let _cols = layout.cols.begin_read_all();
        layout.cells.iter().map(|row| read_row(row).clone()).collect()
    }

    /// Replace the whole sheet with `rows`; the shape is taken from the matrix.
    ///
    /// Rejects an empty or ragged matrix without touching the sheet.
    pub fn replace_all(&self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(SheetError::RaggedRows {
                row,
                expected: cols,
                found,
            });
        }
        let shape = validate_shape(Shape::new(rows.len(), cols))?;
        self.install(Layout::from_rows(rows, shape.cols));
        tracing::debug!("replaced sheet contents, shape {}", shape);
        Ok(())
    }

    /// Swap in a new layout once no operation is in flight.
    fn install(&self, layout: Layout) {
        let _rows = lock(&self.row_growth);
        let _cols = lock(&self.col_growth);
        *self.write_layout() = layout;
    }

    fn read_layout(&self) -> RwLockReadGuard<'_, Layout> {
        self.layout.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_layout(&self) -> RwLockWriteGuard<'_, Layout> {
        self.layout.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CellReader for Sheet {
    fn shape(&self) -> Shape {
        Sheet::shape(self)
    }

    fn cell(&self, row: usize, col: usize) -> Result<String, SheetError> {
        self.get(row, col)
    }
}

impl SnapshotSource for Sheet {
    fn snapshot_cells(&self) -> (Shape, Vec<CellEntry>) {
        let rows = self.to_rows();
        let shape = Shape::new(rows.len(), rows.first().map_or(0, Vec::len));
        let cells = rows
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .filter(|(_, value)| !value.is_empty())
                    .map(move |(c, value)| CellEntry::new(r, c, value))
            })
            .collect();
        (shape, cells)
    }
}

impl SnapshotSink for Sheet {
    fn load_snapshot(&self, shape: Shape, cells: Vec<CellEntry>) -> Result<(), SheetError> {
        let shape = validate_shape(shape)?;
        if let Some(entry) = cells.iter().find(|e| !shape.contains(e.pos)) {
            return Err(SheetError::CellOutOfRange {
                pos: entry.pos,
                shape,
            });
        }
        let count = cells.len();
        let mut rows = vec![vec![String::new(); shape.cols]; shape.rows];
        for CellEntry { pos, value } in cells {
            rows[pos.row][pos.col] = value;
        }
        self.install(Layout::from_rows(rows, shape.cols));
        tracing::debug!("loaded snapshot: shape {}, {} cells", shape, count);
        Ok(())
    }
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_row(row: &RwLock<Vec<String>>) -> RwLockReadGuard<'_, Vec<String>> {
    row.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_row(row: &RwLock<Vec<String>>) -> RwLockWriteGuard<'_, Vec<String>> {
    row.write().unwrap_or_else(PoisonError::into_inner)
}
