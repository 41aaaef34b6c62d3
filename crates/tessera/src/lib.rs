//! Tessera: a grid of text cells shared by many threads.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tessera sub-crates. For most users, adding `tessera` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use tessera::prelude::*;
//!
//! let sheet = Arc::new(Sheet::with_shape(3, 3).unwrap());
//!
//! // Cells in disjoint rows and columns are written in parallel.
//! let writers: Vec<_> = (0..3)
//!     .map(|i| {
//!         let sheet = Arc::clone(&sheet);
//!         thread::spawn(move || sheet.set(i, i, format!("cell {i}")).unwrap())
//!     })
//!     .collect();
//! for w in writers {
//!     w.join().unwrap();
//! }
//!
//! sheet.exchange_rows(0, 2).unwrap();
//! assert_eq!(sheet.get(0, 2).unwrap(), "cell 2");
//!
//! assert_eq!(sheet.insert_row_after(0).unwrap(), 1);
//! assert_eq!(sheet.shape(), Shape::new(4, 3));
//! assert_eq!(sheet.search_string("cell 1").unwrap(), Some(CellPos::new(2, 1)));
//!
//! // Save and restore through the text snapshot format.
//! let mut buf = Vec::new();
//! tessera::snapshot::write_snapshot(&*sheet, &mut buf).unwrap();
//! let copy = Sheet::with_shape(1, 1).unwrap();
//! tessera::snapshot::read_snapshot(&copy, buf.as_slice()).unwrap();
//! assert_eq!(copy.to_rows(), sheet.to_rows());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | Positions, shapes, errors, core traits |
//! | [`engine`] | `tessera-engine` | The shared sheet, axis locks, search |
//! | [`snapshot`] | `tessera-snapshot` | Text snapshot format, save and load |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and errors (`tessera-core`).
///
/// Contains positions, shapes, [`types::SheetError`], and the traits that
/// connect the crates ([`types::CellReader`], [`types::SnapshotSource`],
/// [`types::SnapshotSink`]).
pub use tessera_core as types;

/// The shared sheet (`tessera-engine`).
///
/// [`engine::Sheet`] is the main entry point; [`engine::axis`] holds the
/// per-row and per-column lock state.
pub use tessera_engine as engine;

/// Text snapshot format (`tessera-snapshot`).
///
/// Save a sheet with [`snapshot::save`] and restore it with
/// [`snapshot::load`].
pub use tessera_snapshot as snapshot;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tessera_core::{
        Axis, CellEntry, CellPos, CellReader, Shape, SnapshotSink, SnapshotSource,
    };

    // Errors
    pub use tessera_core::SheetError;
    pub use tessera_engine::ConfigError;
    pub use tessera_snapshot::SnapshotError;

    // Engine
    pub use tessera_engine::{Sheet, SheetConfig};
}
