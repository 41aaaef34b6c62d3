//! Core types and traits for the Tessera shared sheet.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: cell positions,
//! sheet shapes, error types, and the traits that separate the locking
//! engine from the search algorithms and the snapshot codec.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::SheetError;
pub use id::{Axis, CellEntry, CellPos, Shape};
pub use traits::{CellReader, SnapshotSink, SnapshotSource};
