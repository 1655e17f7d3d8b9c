//! Spreadsheet reader producing a [`Table`] of typed cells
//!
//! Only the first worksheet is read and its first row is the header. Numbers,
//! booleans and text keep their type; date cells become serial day numbers,
//! error cells become empty.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{InfragisError, Result};
use crate::models::{Cell, Row, Table};

/// Workbook extensions handled by [`read_workbook`]
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read the first worksheet of a workbook
pub fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InfragisError::FormatError {
            format: "Spreadsheet".to_string(),
            message: "workbook has no worksheets".to_string(),
        })?
        .map_err(spreadsheet_error)?;

    let table = table_from_range(&range);
    tracing::debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "Read spreadsheet"
    );
    Ok(table)
}

fn spreadsheet_error(err: calamine::Error) -> InfragisError {
    InfragisError::FormatError { format: "Spreadsheet".to_string(), message: err.to_string() }
}

/// Build a table from a worksheet range
///
/// Blank header cells are named `__EMPTY`, `__EMPTY_1`, ... Rows with no
/// content are skipped and short rows are padded with empty cells.
pub fn table_from_range(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::default();
    };

    let mut blank_headers = 0;
    let columns: Vec<String> = header
        .iter()
        .map(|data| match to_cell(data).as_text() {
            Some(name) => name,
            None => {
                let name = match blank_headers {
                    0 => "__EMPTY".to_string(),
                    n => format!("__EMPTY_{}", n),
                };
                blank_headers += 1;
                name
            }
        })
        .collect();

    let rows = rows
        .filter(|cells| cells.iter().any(|data| !to_cell(data).is_blank()))
        .map(|cells| {
            let mut row = Row::new();
            for (index, column) in columns.iter().enumerate() {
                row.push(column.clone(), cells.get(index).map(to_cell).unwrap_or_default());
            }
            row
        })
        .collect();

    Table::new(columns, rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::String(text) if text.is_empty() => Cell::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::DateTime(datetime) => Cell::Number(datetime.as_f64()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, data) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), data.clone());
            }
        }
        range
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_cells_keep_their_type() {
        let table = table_from_range(&range(&[
            &[text("Name"), text("Lat"), text("Lng"), text("Start"), text("Active")],
            &[text("Depot"), Data::Float(41.6), Data::Int(-93), Data::Float(45366.0), Data::Bool(true)],
        ]));

        assert_eq!(table.columns, vec!["Name", "Lat", "Lng", "Start", "Active"]);
        let row = &table.rows[0];
        assert_eq!(row.get("Name"), Some(&Cell::text("Depot")));
        assert_eq!(row.get("Lat"), Some(&Cell::Number(41.6)));
        assert_eq!(row.get("Lng"), Some(&Cell::Number(-93.0)));
        assert_eq!(row.get("Start"), Some(&Cell::Number(45366.0)));
        assert_eq!(row.get("Active"), Some(&Cell::Bool(true)));
    }

    #[test]
    fn test_blank_rows_and_missing_cells() {
        let table = table_from_range(&range(&[
            &[text("Name"), text("Cost")],
            &[Data::Empty, Data::Empty],
            &[text("Pump"), Data::Empty],
        ]));

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Cost"), Some(&Cell::Empty));
    }

    #[test]
    fn test_blank_headers_get_placeholder_names() {
        let table = table_from_range(&range(&[
            &[text("Name"), Data::Empty, Data::Empty],
            &[text("Pump"), Data::Float(1.0), Data::Float(2.0)],
        ]));

        assert_eq!(table.columns, vec!["Name", "__EMPTY", "__EMPTY_1"]);
        assert_eq!(table.rows[0].get("__EMPTY_1"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn test_empty_sheet() {
        let table = table_from_range(&Range::empty());
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_unreadable_workbook() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let result = read_workbook(&path);
        assert!(matches!(result, Err(InfragisError::FormatError { .. })));
    }
}
