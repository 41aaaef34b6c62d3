//! Line-level encode/decode for the text snapshot format.
//!
//! ```text
//! <rows>,<cols>
//! <row>,<col>,"<value>"
//! ...
//! ```
//!
//! Lines are separated by `\n`; the last line has no terminator. Readers
//! also accept `\r\n` and a trailing line terminator. Values
//! are wrapped in literal double quotes with no escaping. On load every
//! `"` inside the value field is dropped, so a value containing a quote
//! does not survive a round trip. A value containing a line break cannot
//! be written at all.

use std::io::{BufRead, Write};

use indexmap::IndexMap;
use tessera_core::{CellEntry, CellPos, Shape};

use crate::error::SnapshotError;
use crate::reader::SnapshotReader;
use crate::writer::SnapshotWriter;

/// A decoded snapshot: the declared shape and its cells in file order.
///
/// A position that appears more than once keeps its last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetImage {
    /// Shape declared by the header.
    pub shape: Shape,
    /// Cell values keyed by position, in first-seen order.
    pub cells: IndexMap<CellPos, String>,
}

impl SheetImage {
    /// Empty image of the given shape.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            cells: IndexMap::new(),
        }
    }

    /// Consume the image into entries for a [`SnapshotSink`](tessera_core::SnapshotSink).
    pub fn into_entries(self) -> Vec<CellEntry> {
        self.cells
            .into_iter()
            .map(|(pos, value)| CellEntry { pos, value })
            .collect()
    }
}

// ── Encoding ────────────────────────────────────────────────────

/// Write the `<rows>,<cols>` header, without a line terminator.
pub fn encode_header(w: &mut dyn Write, shape: Shape) -> Result<(), SnapshotError> {
    write!(w, "{},{}", shape.rows, shape.cols)?;
    Ok(())
}

/// Write one cell as a new line, preceded by its `\n` separator.
pub fn encode_cell(w: &mut dyn Write, entry: &CellEntry) -> Result<(), SnapshotError> {
    if entry.value.contains(['\n', '\r']) {
        return Err(SnapshotError::UnencodableValue { pos: entry.pos });
    }
    if entry.value.contains('"') {
        tracing::warn!(
            "cell {} contains a double quote, which is dropped on load",
            entry.pos
        );
    }
    write!(w, "\n{},{},\"{}\"", entry.pos.row, entry.pos.col, entry.value)?;
    Ok(())
}

/// Write a whole snapshot. Empty values are skipped.
///
/// Returns the number of cell lines written.
pub fn encode(w: &mut dyn Write, shape: Shape, cells: &[CellEntry]) -> Result<usize, SnapshotError> {
    let mut writer = SnapshotWriter::new(w, shape)?;
    for entry in cells {
        writer.write_cell(entry)?;
    }
    tracing::debug!(
        "encoded snapshot: shape {}, {} cells",
        shape,
        writer.cells_written()
    );
    Ok(writer.cells_written())
}

// ── Decoding ────────────────────────────────────────────────────

/// Parse a `<rows>,<cols>` header line.
pub fn decode_header(line: &str) -> Result<Shape, SnapshotError> {
    let malformed = |detail: String| SnapshotError::MalformedHeader { detail };
    let (rows, cols) = line
        .split_once(',')
        .ok_or_else(|| malformed(format!("expected `rows,cols`, found {line:?}")))?;
    let rows = parse_index(rows).map_err(|e| malformed(format!("row count: {e}")))?;
    let cols = parse_index(cols).map_err(|e| malformed(format!("column count: {e}")))?;
    Ok(Shape::new(rows, cols))
}

/// Parse a `<row>,<col>,"<value>"` line and check it against `shape`.
///
/// `line_no` is one-based and only used for error reporting.
pub fn decode_cell(line: &str, line_no: usize, shape: Shape) -> Result<CellEntry, SnapshotError> {
    let malformed = |detail: String| SnapshotError::MalformedLine {
        line: line_no,
        detail,
    };
    let mut fields = line.splitn(3, ',');
    let (Some(row), Some(col), Some(value)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed(format!("expected `row,col,\"value\"`, found {line:?}")));
    };
    let row = parse_index(row).map_err(|e| malformed(format!("row: {e}")))?;
    let col = parse_index(col).map_err(|e| malformed(format!("col: {e}")))?;
    let pos = CellPos::new(row, col);
    if !shape.contains(pos) {
        return Err(malformed(format!("cell {pos} outside sheet of shape {shape}")));
    }
    let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if !quoted {
        return Err(malformed(format!("value {value:?} is not double-quoted")));
    }
    Ok(CellEntry {
        pos,
        value: value.replace('"', ""),
    })
}

/// Read a whole snapshot from `r`.
///
/// Decoding finishes before anything is returned, so a malformed file
/// never yields a partial image.
pub fn decode(r: impl BufRead) -> Result<SheetImage, SnapshotError> {
    SnapshotReader::open(r)?.read_image()
}

fn parse_index(field: &str) -> Result<usize, String> {
    field
        .parse::<usize>()
        .map_err(|e| format!("{field:?} is not a non-negative integer ({e})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_string(shape: Shape, cells: &[CellEntry]) -> String {
        let mut buf = Vec::new();
        encode(&mut buf, shape, cells).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn encodes_documented_layout() {
        let text = encode_to_string(
            Shape::new(50, 50),
            &[
                CellEntry::new(3, 4, "Hi"),
                CellEntry::new(5, 10, "OOO"),
                CellEntry::new(7, 7, ""),
                CellEntry::new(13, 2, "EE"),
            ],
        );
        assert_eq!(text, "50,50\n3,4,\"Hi\"\n5,10,\"OOO\"\n13,2,\"EE\"");
    }

    #[test]
    fn decodes_documented_layout() {
        let image = decode("50,50\n3,4,\"Hi\"\n13,2,\"EE\"\n".as_bytes()).unwrap();
        assert_eq!(image.shape, Shape::new(50, 50));
        assert_eq!(
            image.into_entries(),
            vec![CellEntry::new(3, 4, "Hi"), CellEntry::new(13, 2, "EE")]
        );
    }

    #[test]
    fn header_only_is_an_empty_sheet() {
        let image = decode("2,3".as_bytes()).unwrap();
        assert_eq!(image, SheetImage::new(Shape::new(2, 3)));
    }

    #[test]
    fn commas_survive_quotes_do_not() {
        let entry = decode_cell("1,0,\"a, b, c\"", 2, Shape::new(2, 2)).unwrap();
        assert_eq!(entry.value, "a, b, c");

        let entry = decode_cell("1,0,\"say \"hi\"\"", 2, Shape::new(2, 2)).unwrap();
        assert_eq!(entry.value, "say hi");
    }

    #[test]
    fn crlf_line_endings_accepted() {
        let image = decode("1,1\r\n0,0,\"x\"\r\n".as_bytes()).unwrap();
        assert_eq!(image.cells[&CellPos::new(0, 0)], "x");
    }

    #[test]
    fn repeated_position_keeps_last_value() {
        let image = decode("2,2\n0,1,\"a\"\n1,1,\"b\"\n0,1,\"c\"".as_bytes()).unwrap();
        assert_eq!(
            image.into_entries(),
            vec![CellEntry::new(0, 1, "c"), CellEntry::new(1, 1, "b")]
        );
    }

    #[test]
    fn malformed_header_rejected() {
        for text in ["", "5", "5,x", "-1,3", " 5,5", "5;5"] {
            assert!(
                matches!(
                    decode(text.as_bytes()),
                    Err(SnapshotError::MalformedHeader { .. })
                ),
                "accepted header {text:?}"
            );
        }
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let cases = [
            ("3,3\n0,0,\"ok\"\n1,1", 3),
            ("3,3\n0,0,\"ok\"\nx,1,\"v\"", 3),
            ("3,3\n0,0,unquoted", 2),
            ("3,3\n0,0,\"", 2),
            ("3,3\n\n0,0,\"v\"", 2),
            ("3,3\n0,3,\"v\"", 2),
        ];
        for (text, expected) in cases {
            match decode(text.as_bytes()) {
                Err(SnapshotError::MalformedLine { line, .. }) => {
                    assert_eq!(line, expected, "wrong line for {text:?}")
                }
                other => panic!("expected MalformedLine for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn out_of_shape_cell_not_written() {
        let mut buf = Vec::new();
        let err = encode(&mut buf, Shape::new(2, 2), &[CellEntry::new(2, 0, "v")]).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Rejected(tessera_core::SheetError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn line_breaks_cannot_be_encoded() {
        let mut buf = Vec::new();
        let err = encode(
            &mut buf,
            Shape::new(1, 1),
            &[CellEntry::new(0, 0, "two\nlines")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnencodableValue { pos } if pos == CellPos::new(0, 0)
        ));
    }
}
