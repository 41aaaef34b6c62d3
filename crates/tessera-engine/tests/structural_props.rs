//! Property tests for exchange, insert, and bulk access on arbitrary sheets.

use proptest::prelude::*;
use tessera_core::{CellEntry, SnapshotSink, SnapshotSource};
use tessera_engine::Sheet;

/// A small sheet with roughly half its cells filled.
fn arb_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(
            prop::collection::vec(prop_oneof![Just(String::new()), "[a-z,]{1,6}"], cols),
            rows,
        )
    })
}

fn sheet_from(rows: &[Vec<String>]) -> Sheet {
    let sheet = Sheet::with_shape(1, 1).unwrap();
    sheet.replace_all(rows.to_vec()).unwrap();
    sheet
}

proptest! {
    #[test]
    fn exchange_rows_twice_restores(rows in arb_rows(), a in 0usize..6, b in 0usize..6) {
        let n = rows.len();
        let (a, b) = (a % n, b % n);
        let sheet = sheet_from(&rows);
        sheet.exchange_rows(a, b).unwrap();
        let swapped = sheet.to_rows();
        prop_assert_eq!(&swapped[a], &rows[b]);
        sheet.exchange_rows(a, b).unwrap();
        prop_assert_eq!(sheet.to_rows(), rows);
    }

    #[test]
    fn exchange_cols_twice_restores(rows in arb_rows(), a in 0usize..6, b in 0usize..6) {
        let n = rows[0].len();
        let (a, b) = (a % n, b % n);
        let sheet = sheet_from(&rows);
        sheet.exchange_cols(a, b).unwrap();
        sheet.exchange_cols(b, a).unwrap();
        prop_assert_eq!(sheet.to_rows(), rows);
    }

    #[test]
    fn insert_row_shifts_tail_down(rows in arb_rows(), after in 0usize..6) {
        let after = after % rows.len();
        let sheet = sheet_from(&rows);
        prop_assert_eq!(sheet.insert_row_after(after).unwrap(), after + 1);

        let now = sheet.to_rows();
        prop_assert_eq!(now.len(), rows.len() + 1);
        prop_assert!(now[after + 1].iter().all(String::is_empty));
        prop_assert_eq!(&now[..=after], &rows[..=after]);
        prop_assert_eq!(&now[after + 2..], &rows[after + 1..]);
    }

    #[test]
    fn insert_col_shifts_tail_right(rows in arb_rows(), after in 0usize..6) {
        let after = after % rows[0].len();
        let sheet = sheet_from(&rows);
        prop_assert_eq!(sheet.insert_col_after(after).unwrap(), after + 1);

        for (now, before) in sheet.to_rows().iter().zip(&rows) {
            prop_assert_eq!(now.len(), before.len() + 1);
            prop_assert!(now[after + 1].is_empty());
            prop_assert_eq!(&now[..=after], &before[..=after]);
            prop_assert_eq!(&now[after + 2..], &before[after + 1..]);
        }
    }

    #[test]
    fn snapshot_reload_reconstructs(rows in arb_rows()) {
        let sheet = sheet_from(&rows);
        let (shape, cells) = sheet.snapshot_cells();
        prop_assert!(cells.iter().all(|CellEntry { value, .. }| !value.is_empty()), "snapshot contains an empty cell");

        let copy = Sheet::with_shape(1, 1).unwrap();
        copy.load_snapshot(shape, cells).unwrap();
        prop_assert_eq!(copy.to_rows(), rows);
    }

    #[test]
    fn bulk_read_matches_cell_reads(rows in arb_rows()) {
        let sheet = sheet_from(&rows);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                prop_assert_eq!(&sheet.get(r, c).unwrap(), value);
            }
        }
    }
}
