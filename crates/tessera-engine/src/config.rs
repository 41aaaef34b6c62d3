//! Sheet configuration, validation, and error types.
//!
//! [`SheetConfig`] is the builder-input for constructing a [`Sheet`](crate::Sheet).
//! [`validate()`](SheetConfig::validate) checks the shape once at startup;
//! the same checks run again whenever a snapshot replaces the contents.

use std::error::Error;
use std::fmt;

use tessera_core::{Shape, SheetError};

// ── SheetConfig ────────────────────────────────────────────────────

/// Initial dimensions of a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    /// Number of rows. Must be at least 1.
    pub rows: usize,
    /// Number of columns. Must be at least 1.
    pub cols: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self { rows: 50, cols: 50 }
    }
}

impl SheetConfig {
    /// Config for a `rows x cols` sheet.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Check structural invariants and return the validated shape.
    pub fn validate(&self) -> Result<Shape, ConfigError> {
        validate_shape(Shape::new(self.rows, self.cols)).map_err(ConfigError::from)
    }
}

/// Largest number of cells a sheet may be created or loaded with.
///
/// Every cell is allocated up front, so this bounds what a snapshot header
/// can request. Inserts may grow a sheet past it.
pub const MAX_CELLS: usize = 1 << 26;

/// Reject empty shapes and shapes with more than [`MAX_CELLS`] cells.
pub(crate) fn validate_shape(shape: Shape) -> Result<Shape, SheetError> {
    if shape.is_empty() {
        return Err(SheetError::EmptySheet);
    }
    if shape.checked_cell_count().is_none_or(|cells| cells > MAX_CELLS) {
        return Err(SheetError::TooLarge {
            rows: shape.rows,
            cols: shape.cols,
        });
    }
    Ok(shape)
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SheetConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Zero rows or zero columns.
    EmptySheet,
    /// `rows * cols` exceeds [`MAX_CELLS`].
    TooLarge {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySheet => write!(f, "sheet must have at least one row and one column"),
            Self::TooLarge { rows, cols } => {
                write!(f, "sheet of {rows}x{cols} cells is too large")
            }
        }
    }
}

impl Error for ConfigError {}

impl From<SheetError> for ConfigError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::TooLarge { rows, cols } => Self::TooLarge { rows, cols },
            _ => Self::EmptySheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let shape = SheetConfig::default().validate().unwrap();
        assert_eq!(shape, Shape::new(50, 50));
    }

    #[test]
    fn zero_rows_or_cols_rejected() {
        assert_eq!(
            SheetConfig::new(0, 3).validate(),
            Err(ConfigError::EmptySheet)
        );
        assert_eq!(
            SheetConfig::new(3, 0).validate(),
            Err(ConfigError::EmptySheet)
        );
    }

    #[test]
    fn overflowing_shape_rejected() {
        assert_eq!(
            SheetConfig::new(usize::MAX, 2).validate(),
            Err(ConfigError::TooLarge {
                rows: usize::MAX,
                cols: 2,
            })
        );
    }

    #[test]
    fn cell_cap_is_inclusive() {
        assert_eq!(
            SheetConfig::new(1 << 13, 1 << 13).validate(),
            Ok(Shape::new(1 << 13, 1 << 13))
        );
        assert_eq!(
            SheetConfig::new((1 << 13) + 1, 1 << 13).validate(),
            Err(ConfigError::TooLarge {
                rows: (1 << 13) + 1,
                cols: 1 << 13,
            })
        );
    }

    #[test]
    fn one_by_one_is_valid() {
        assert_eq!(
            SheetConfig::new(1, 1).validate(),
            Ok(Shape::new(1, 1))
        );
    }
}
