//! Streaming snapshot writer.
//!
//! [`SnapshotWriter`] writes the header on construction and then one line
//! per non-empty cell.

use std::io::Write;

use tessera_core::{CellEntry, Shape, SheetError};

use crate::codec::{encode_cell, encode_header};
use crate::error::SnapshotError;

/// Writes a snapshot to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use tessera_core::{CellEntry, Shape};
/// use tessera_snapshot::{SnapshotReader, SnapshotWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = SnapshotWriter::new(&mut buf, Shape::new(3, 3)).unwrap();
/// writer.write_cell(&CellEntry::new(1, 2, "hello")).unwrap();
/// assert_eq!(writer.cells_written(), 1);
/// drop(writer);
/// assert_eq!(buf, b"3,3\n1,2,\"hello\"");
///
/// let mut reader = SnapshotReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.shape(), Shape::new(3, 3));
/// assert_eq!(reader.next_cell().unwrap(), Some(CellEntry::new(1, 2, "hello")));
/// assert_eq!(reader.next_cell().unwrap(), None);
/// ```
pub struct SnapshotWriter<W: Write> {
    writer: W,
    shape: Shape,
    cells_written: usize,
}

impl<W: Write> SnapshotWriter<W> {
    /// Create a writer, immediately writing the header.
    pub fn new(mut writer: W, shape: Shape) -> Result<Self, SnapshotError> {
        encode_header(&mut writer, shape)?;
        Ok(Self {
            writer,
            shape,
            cells_written: 0,
        })
    }

    /// Write one cell. Empty values are skipped.
    ///
    /// The position must lie inside the header shape, or the file would
    /// not load back.
    pub fn write_cell(&mut self, entry: &CellEntry) -> Result<(), SnapshotError> {
        if entry.value.is_empty() {
            return Ok(());
        }
        if !self.shape.contains(entry.pos) {
            return Err(SnapshotError::Rejected(SheetError::CellOutOfRange {
                pos: entry.pos,
                shape: self.shape,
            }));
        }
        encode_cell(&mut self.writer, entry)?;
        self.cells_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), SnapshotError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of cell lines written so far.
    pub fn cells_written(&self) -> usize {
        self.cells_written
    }
}
