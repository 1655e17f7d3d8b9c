//! CSV reader producing a [`Table`] of text cells

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::{Cell, Row, Table};

/// Read a CSV file with a header row
pub fn read_table(path: &Path, delimiter: char) -> Result<Table> {
    let file = File::open(path)?;
    let table = read_table_from(file, delimiter)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "Read CSV table"
    );
    Ok(table)
}

/// Read CSV from any reader
///
/// Values are trimmed. Short records are padded with empty cells; extra
/// values beyond the header are ignored. Fully blank lines are skipped.
pub fn read_table_from<R: Read>(reader: R, delimiter: char) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut row = Row::new();
        for (index, column) in columns.iter().enumerate() {
            let cell = match record.get(index) {
                Some(value) if !value.is_empty() => Cell::Text(value.to_string()),
                _ => Cell::Empty,
            };
            row.push(column.clone(), cell);
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_quoted_values() {
        let data = "Name,Cost,Notes\n\"Bridge, north\",\"$1,200\",\"said \"\"ok\"\"\"\n";
        let table = read_table_from(data.as_bytes(), ',').unwrap();

        assert_eq!(table.columns, vec!["Name", "Cost", "Notes"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Name"), Some(&Cell::text("Bridge, north")));
        assert_eq!(table.rows[0].get("Cost"), Some(&Cell::text("$1,200")));
        assert_eq!(table.rows[0].get("Notes"), Some(&Cell::text("said \"ok\"")));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "a,b,c\n1\n\n2,3,4,5\n";
        let table = read_table_from(data.as_bytes(), ',').unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("c"), Some(&Cell::Empty));
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let data = "lat;lon\n41.6;-93.6\n";
        let table = read_table_from(data.as_bytes(), ';').unwrap();
        assert_eq!(table.rows[0].get("lon"), Some(&Cell::text("-93.6")));
    }

    #[test]
    fn test_header_only() {
        let table = read_table_from("lat,lon\n".as_bytes(), ',').unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 2);
    }
}
