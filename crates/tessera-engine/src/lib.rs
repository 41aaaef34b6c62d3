//! Two-axis reader/writer locking engine for the Tessera shared sheet.
//!
//! Provides [`Sheet`], a grid of text cells shared between threads. Every
//! row and every column carries its own lock state ([`axis`]); cell reads
//! and writes serialize only against operations on the same row or column,
//! and structural edits (exchange, insert) lock the indices they touch in
//! ascending order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
pub mod search;
pub mod sheet;

pub use config::{ConfigError, SheetConfig, MAX_CELLS};
pub use sheet::Sheet;
