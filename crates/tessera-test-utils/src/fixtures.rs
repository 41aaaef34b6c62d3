//! Reusable snapshot fixtures.
//!
//! - [`labelled_rows`]: a dense matrix whose every cell names its position.
//! - [`StaticSource`]: a [`SnapshotSource`] returning fixed contents.
//! - [`RecordingSink`]: a [`SnapshotSink`] that remembers what it was given.

use std::sync::Mutex;

use tessera_core::{CellEntry, Shape, SheetError, SnapshotSink, SnapshotSource};

/// `rows x cols` matrix where cell `(r, c)` holds `"r/c"`.
pub fn labelled_rows(rows: usize, cols: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|r| (0..cols).map(|c| format!("{r}/{c}")).collect())
        .collect()
}

/// Serves the same shape and cells on every call.
pub struct StaticSource {
    pub shape: Shape,
    pub cells: Vec<CellEntry>,
}

impl StaticSource {
    pub fn new(shape: Shape, cells: Vec<CellEntry>) -> Self {
        Self { shape, cells }
    }
}

impl SnapshotSource for StaticSource {
    fn snapshot_cells(&self) -> (Shape, Vec<CellEntry>) {
        (self.shape, self.cells.clone())
    }
}

/// Accepts any in-bounds snapshot and keeps the last one.
#[derive(Default)]
pub struct RecordingSink {
    loaded: Mutex<Option<(Shape, Vec<CellEntry>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent accepted snapshot, if any.
    pub fn loaded(&self) -> Option<(Shape, Vec<CellEntry>)> {
        self.loaded.lock().unwrap().clone()
    }
}

impl SnapshotSink for RecordingSink {
    fn load_snapshot(&self, shape: Shape, cells: Vec<CellEntry>) -> Result<(), SheetError> {
        if let Some(entry) = cells.iter().find(|e| !shape.contains(e.pos)) {
            return Err(SheetError::CellOutOfRange {
                pos: entry.pos,
                shape,
            });
        }
        *self.loaded.lock().unwrap() = Some((shape, cells));
        Ok(())
    }
}
