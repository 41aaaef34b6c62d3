//! Text snapshot format for saving and loading Tessera sheets.
//!
//! A snapshot records the sheet shape and every non-empty cell. Loading
//! replaces the target sheet completely; cells not mentioned become empty.
//!
//! # Architecture
//!
//! - [`SnapshotWriter`] streams cells to any `Write` sink
//! - [`SnapshotReader`] streams cells from any `BufRead` source
//! - [`write_snapshot`] / [`read_snapshot`] move a whole sheet through a
//!   [`SnapshotSource`] / [`SnapshotSink`]
//! - [`save`] / [`load`] do the same against a file path
//!
//! # Format
//!
//! ```text
//! 50,50
//! 3,4,"Hi"
//! 5,10,"OOO"
//! 13,2,"EE"
//! ```
//!
//! See [`codec`] for the exact rules and known limitations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tessera_core::{Shape, SnapshotSink, SnapshotSource};

pub use codec::{decode, encode, SheetImage};
pub use error::SnapshotError;
pub use reader::{CellIter, SnapshotReader};
pub use writer::SnapshotWriter;

/// Write the current contents of `source` to `w`.
///
/// Returns the number of cells written.
pub fn write_snapshot(source: &impl SnapshotSource, w: impl Write) -> Result<usize, SnapshotError> {
    let (shape, cells) = source.snapshot_cells();
    let mut writer = SnapshotWriter::new(w, shape)?;
    for entry in &cells {
        writer.write_cell(entry)?;
    }
    writer.flush()?;
    tracing::debug!(
        "wrote snapshot: shape {}, {} cells",
        shape,
        writer.cells_written()
    );
    Ok(writer.cells_written())
}

/// Decode a snapshot from `r` and load it into `sink`.
///
/// The whole stream is decoded before the sink is touched, so a malformed
/// snapshot leaves the sink unchanged. Returns the loaded shape.
pub fn read_snapshot(sink: &impl SnapshotSink, r: impl BufRead) -> Result<Shape, SnapshotError> {
    let image = decode(r)?;
    let shape = image.shape;
    sink.load_snapshot(shape, image.into_entries())?;
    Ok(shape)
}

/// Save `source` to the file at `path`, replacing any existing file.
///
/// The snapshot goes to a temporary file in the same directory, which is
/// renamed over `path` only once every cell is written. A failed save
/// leaves any earlier file at `path` untouched. The path is used exactly
/// as given; no extension is added.
pub fn save(source: &impl SnapshotSource, path: impl AsRef<Path>) -> Result<usize, SnapshotError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    let written = write_snapshot(source, BufWriter::new(&mut staged))?;
    staged.persist(path).map_err(|e| e.error)?;
    tracing::debug!("saved snapshot to {}", path.display());
    Ok(written)
}

/// Load the file at `path` into `sink`.
///
/// Returns the loaded shape. On any error the sink is left unchanged.
pub fn load(sink: &impl SnapshotSink, path: impl AsRef<Path>) -> Result<Shape, SnapshotError> {
    let path = path.as_ref();
    let shape = read_snapshot(sink, BufReader::new(File::open(path)?))?;
    tracing::debug!("loaded snapshot from {}", path.display());
    Ok(shape)
}
