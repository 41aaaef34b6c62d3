//! Streaming snapshot reader.
//!
//! [`SnapshotReader`] validates the header on construction and then
//! yields one [`CellEntry`] per line.

use std::io::{BufRead, Lines};

use tessera_core::{CellEntry, Shape};

use crate::codec::{decode_cell, decode_header, SheetImage};
use crate::error::SnapshotError;

/// Reads a snapshot from a byte stream.
///
/// Generic over `R: BufRead` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct SnapshotReader<R: BufRead> {
    lines: Lines<R>,
    shape: Shape,
    line_no: usize,
}

impl<R: BufRead> SnapshotReader<R> {
    /// Open a snapshot stream, reading and validating the header.
    pub fn open(reader: R) -> Result<Self, SnapshotError> {
        let mut lines = reader.lines();
        let header = lines
            .next()
            .transpose()?
            .ok_or_else(|| SnapshotError::MalformedHeader {
                detail: "missing header line".into(),
            })?;
        let shape = decode_header(&header)?;
        Ok(Self {
            lines,
            shape,
            line_no: 1,
        })
    }

    /// Shape declared by the header.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Read the next cell, or `None` at the end of the stream.
    pub fn next_cell(&mut self) -> Result<Option<CellEntry>, SnapshotError> {
        let Some(line) = self.lines.next().transpose()? else {
            return Ok(None);
        };
        self.line_no += 1;
        decode_cell(&line, self.line_no, self.shape).map(Some)
    }

    /// Number of lines consumed so far, header included.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Read every remaining cell into an image.
    ///
    /// A repeated position keeps its last value.
    pub fn read_image(mut self) -> Result<SheetImage, SnapshotError> {
        let mut image = SheetImage::new(self.shape);
        while let Some(entry) = self.next_cell()? {
            if image.cells.insert(entry.pos, entry.value).is_some() {
                tracing::warn!(
                    "snapshot line {}: cell {} repeated, keeping the later value",
                    self.line_no,
                    entry.pos
                );
            }
        }
        tracing::debug!(
            "decoded snapshot: shape {}, {} cells",
            image.shape,
            image.cells.len()
        );
        Ok(image)
    }

    /// Convert into a cell iterator.
    pub fn cells(self) -> CellIter<R> {
        CellIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator adapter over snapshot cells. Stops after the first error.
pub struct CellIter<R: BufRead> {
    reader: SnapshotReader<R>,
    done: bool,
}

impl<R: BufRead> Iterator for CellIter<R> {
    type Item = Result<CellEntry, SnapshotError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_cell() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_cells_in_file_order() {
        let reader = SnapshotReader::open("4,4\n3,0,\"d\"\n0,3,\"a\"".as_bytes()).unwrap();
        assert_eq!(reader.shape(), Shape::new(4, 4));
        let cells: Vec<_> = reader.cells().collect::<Result<_, _>>().unwrap();
        assert_eq!(cells, vec![CellEntry::new(3, 0, "d"), CellEntry::new(0, 3, "a")]);
    }

    #[test]
    fn iterator_stops_after_error() {
        let reader = SnapshotReader::open("2,2\n0,0,\"a\"\nbad\n1,1,\"b\"".as_bytes()).unwrap();
        let results: Vec<_> = reader.cells().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(SnapshotError::MalformedLine { line: 3, .. })
        ));
    }

    #[test]
    fn counts_lines() {
        let mut reader = SnapshotReader::open("2,2\n0,0,\"a\"".as_bytes()).unwrap();
        assert_eq!(reader.lines_read(), 1);
        reader.next_cell().unwrap();
        assert_eq!(reader.lines_read(), 2);
        assert_eq!(reader.next_cell().unwrap(), None);
        assert_eq!(reader.lines_read(), 2);
    }
}
