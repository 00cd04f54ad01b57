use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;

use super::DatasetError;

/// Shared blank used for cells outside a row's stored width.
pub static EMPTY_CELL: Cell = Cell::Empty;

/// A single spreadsheet cell, detached from the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#N/A`
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ts) => Cell::DateTime(ts),
                None => Cell::Error(format!("unrepresentable date serial {}", dt.as_f64())),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }
}

/// Header row plus data rows of one worksheet.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Cell at `(row, col)`, treating short rows as blank-padded.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Read the first worksheet of a workbook held in memory. The first row is the header.
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable, DatasetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| DatasetError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DatasetError::EmptyWorkbook)?
        .map_err(|e| DatasetError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| match cell {
                Data::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => return Ok(RawTable::default()),
    };

    let mut data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>())
        .collect();

    // Formatting often extends the used range past the last booking
    while data
        .last()
        .is_some_and(|row| row.iter().all(Cell::is_empty))
    {
        data.pop();
    }

    Ok(RawTable::new(headers, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_that_are_not_a_workbook() {
        let err = read_workbook(b"definitely not a spreadsheet").unwrap_err();
        assert!(matches!(err, DatasetError::Workbook(_)));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let table = RawTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Number(1.0)]],
        );
        assert_eq!(table.cell(0, 0), &Cell::Number(1.0));
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn converts_calamine_values() {
        assert_eq!(Cell::from(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(Cell::from(&Data::String("x".into())), Cell::Text("x".into()));
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert!(Cell::Text("   ".into()).is_empty());
    }

    fn sheet_bytes(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        build(workbook.add_worksheet());
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_native_date_cells_as_datetimes() {
        let bytes = sheet_bytes(|sheet| {
            let format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd hh:mm");
            let check_in = rust_xlsxwriter::ExcelDateTime::parse_from_str("2025-03-01 15:00:00").unwrap();
            sheet.write_string(0, 0, "Check-in").unwrap();
            sheet.write_string(0, 1, "Noites").unwrap();
            sheet.write_datetime_with_format(1, 0, &check_in, &format).unwrap();
            sheet.write_number(1, 1, 2.0).unwrap();
        });

        let table = read_workbook(&bytes).unwrap();
        assert_eq!(table.headers, vec!["Check-in".to_string(), "Noites".to_string()]);
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        assert_eq!(table.cell(0, 0), &Cell::DateTime(expected));
        assert_eq!(table.cell(0, 1), &Cell::Number(2.0));
    }

    #[test]
    fn trailing_blank_rows_are_trimmed() {
        let bytes = sheet_bytes(|sheet| {
            sheet.write_string(0, 0, "Anúncio").unwrap();
            sheet.write_string(1, 0, "C101").unwrap();
            sheet.write_string(2, 0, "   ").unwrap();
            sheet.write_string(3, 0, "").unwrap();
            sheet.write_string(4, 0, " ").unwrap();
        });

        let table = read_workbook(&bytes).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 0), &Cell::Text("C101".to_string()));
    }
}
