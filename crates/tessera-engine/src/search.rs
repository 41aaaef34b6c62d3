//! Linear scans built on single-cell reads.
//!
//! Every function goes through [`CellReader::cell`] and holds nothing
//! between cells, so a scan sees a sequence of individually consistent
//! cells rather than one snapshot of the region. "Not found" is `Ok(None)`.

use std::ops::Range;

use tessera_core::{Axis, CellPos, CellReader, SheetError};

/// First cell equal to `value`, scanning the whole sheet row-major.
pub fn search_string(grid: &impl CellReader, value: &str) -> Result<Option<CellPos>, SheetError> {
    let shape = grid.shape();
    scan(grid, 0..shape.rows, 0..shape.cols, value)
}

/// Leftmost column of `row` whose cell equals `value`.
pub fn search_in_row(
    grid: &impl CellReader,
    row: usize,
    value: &str,
) -> Result<Option<usize>, SheetError> {
    let shape = grid.shape();
    SheetError::check_index(Axis::Row, row, shape.rows)?;
    for col in 0..shape.cols {
        if grid.cell(row, col)? == value {
            return Ok(Some(col));
        }
    }
    Ok(None)
}

/// Topmost row of `col` whose cell equals `value`.
pub fn search_in_col(
    grid: &impl CellReader,
    col: usize,
    value: &str,
) -> Result<Option<usize>, SheetError> {
    let shape = grid.shape();
    SheetError::check_index(Axis::Col, col, shape.cols)?;
    for row in 0..shape.rows {
        if grid.cell(row, col)? == value {
            return Ok(Some(row));
        }
    }
    Ok(None)
}

/// First match in the inclusive rectangle `[r1, r2] x [c1, c2]`, row-major.
///
/// Bounds are clamped to the sheet instead of rejected: a negative lower
/// bound becomes 0 and an upper bound past the end becomes the last index.
/// A range that is empty after clamping finds nothing, without error.
pub fn search_in_range(
    grid: &impl CellReader,
    r1: i64,
    r2: i64,
    c1: i64,
    c2: i64,
    value: &str,
) -> Result<Option<CellPos>, SheetError> {
    let shape = grid.shape();
    let rows = span(r1, r2, shape.rows);
    let cols = span(c1, c2, shape.cols);
    scan(grid, rows, cols, value)
}

/// Half-open index range for the inclusive bounds `[low, high]`, clipped
/// to `0..len`.
fn span(low: i64, high: i64, len: usize) -> Range<usize> {
    let start = usize::try_from(low).unwrap_or(0);
    let end = usize::try_from(high.saturating_add(1)).map_or(0, |end| end.min(len));
    start..end
}

fn scan(
    grid: &impl CellReader,
    rows: Range<usize>,
    cols: Range<usize>,
    value: &str,
) -> Result<Option<CellPos>, SheetError> {
    for row in rows {
        for col in cols.clone() {
            if grid.cell(row, col)? == value {
                return Ok(Some(CellPos::new(row, col)));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tessera_test_utils::MockGrid;

    fn grid() -> MockGrid {
        MockGrid::from_rows(&[
            &["a", "b", "c"],
            &["d", "x", "f"],
            &["x", "h", "x"],
        ])
    }

    #[test]
    fn search_string_is_row_major() {
        assert_eq!(search_string(&grid(), "x").unwrap(), Some(CellPos::new(1, 1)));
        assert_eq!(search_string(&grid(), "zz").unwrap(), None);
    }

    #[test]
    fn row_and_col_scans_pick_first_match() {
        let g = grid();
        assert_eq!(search_in_row(&g, 2, "x").unwrap(), Some(0));
        assert_eq!(search_in_col(&g, 0, "x").unwrap(), Some(2));
        assert_eq!(search_in_col(&g, 2, "b").unwrap(), None);
    }

    #[test]
    fn row_and_col_scans_reject_bad_index() {
        let g = grid();
        assert!(matches!(
            search_in_row(&g, 3, "x"),
            Err(SheetError::IndexOutOfRange { axis: Axis::Row, .. })
        ));
        assert!(matches!(
            search_in_col(&g, 7, "x"),
            Err(SheetError::IndexOutOfRange { axis: Axis::Col, .. })
        ));
    }

    #[test]
    fn range_is_inclusive() {
        let g = grid();
        assert_eq!(
            search_in_range(&g, 2, 2, 1, 2, "x").unwrap(),
            Some(CellPos::new(2, 2))
        );
        assert_eq!(search_in_range(&g, 0, 0, 0, 2, "x").unwrap(), None);
    }

    #[test]
    fn range_bounds_are_clamped() {
        let g = grid();
        assert_eq!(
            search_in_range(&g, -5, 103, 0, 0, "x").unwrap(),
            search_in_range(&g, 0, 2, 0, 0, "x").unwrap()
        );
        assert_eq!(
            search_in_range(&g, -5, 103, 0, 0, "x").unwrap(),
            Some(CellPos::new(2, 0))
        );
    }

    #[test]
    fn empty_range_finds_nothing() {
        let g = grid();
        assert_eq!(search_in_range(&g, 2, 1, 0, 2, "x").unwrap(), None);
        assert_eq!(search_in_range(&g, -3, -1, 0, 2, "a").unwrap(), None);
        assert_eq!(search_in_range(&g, 0, 2, -9, -2, "a").unwrap(), None);
        assert_eq!(search_in_range(&g, 5, 9, 0, 2, "x").unwrap(), None);
    }

    #[test]
    fn reads_go_through_the_reader() {
        let g = grid();
        search_string(&g, "zz").unwrap();
        assert_eq!(g.reads(), 9);
    }

    proptest! {
        #[test]
        fn clamped_range_matches_exact_range(
            extra_low in 1i64..50,
            extra_high in 0i64..50,
            col in 0usize..3,
        ) {
            let g = grid();
            let clamped = search_in_range(&g, -extra_low, 2 + extra_high, col as i64, col as i64, "x").unwrap();
            let exact = search_in_range(&g, 0, 2, col as i64, col as i64, "x").unwrap();
            prop_assert_eq!(clamped, exact);
        }
    }
}
