//! Error types for the snapshot codec.

use std::fmt;
use std::io;

use tessera_core::{CellPos, SheetError};

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The first line is missing or is not `<rows>,<cols>`.
    MalformedHeader {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A cell line is not `<row>,<col>,"<value>"` or lies outside the header shape.
    MalformedLine {
        /// One-based line number in the file.
        line: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A cell value contains a line break and cannot be written.
    UnencodableValue {
        /// Position of the offending cell.
        pos: CellPos,
    },
    /// The decoded snapshot was refused by the sheet.
    Rejected(SheetError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedHeader { detail } => write!(f, "malformed header: {detail}"),
            Self::MalformedLine { line, detail } => {
                write!(f, "malformed line {line}: {detail}")
            }
            Self::UnencodableValue { pos } => {
                write!(f, "cell {pos} contains a line break and cannot be saved")
            }
            Self::Rejected(e) => write!(f, "snapshot rejected: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SheetError> for SnapshotError {
    fn from(e: SheetError) -> Self {
        Self::Rejected(e)
    }
}
