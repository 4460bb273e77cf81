//! Decodes uploaded bytes into named sheets of string cells.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;

use super::imports_errors::ImportError;

/// A named grid of cells: the header row plus every following non-empty row.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Decode CSV bytes into a single sheet named after the file. A UTF-8 BOM is
/// stripped and records may vary in length.
pub fn read_csv(name: &str, bytes: &[u8]) -> Result<Sheet, ImportError> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        rows.push(cells);
    }

    Ok(Sheet {
        name: name.to_string(),
        headers,
        rows,
    })
}

/// Decode an xlsx workbook into one sheet per worksheet.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Sheet>, ImportError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = Xlsx::new(cursor)?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name)?;
        let mut row_iter = range.rows();

        let headers: Vec<String> = row_iter
            .next()
            .map(|row| row.iter().map(render_cell).collect())
            .unwrap_or_default();

        let mut rows = Vec::new();
        for row in row_iter {
            let cells: Vec<String> = row.iter().map(render_cell).collect();
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        sheets.push(Sheet {
            name: sheet_name,
            headers,
            rows,
        });
    }

    Ok(sheets)
}

/// Render a workbook cell to the string form the row parsers expect: text is
/// trimmed, whole numbers lose the trailing `.0`, date cells become ISO
/// dates, empty cells become empty strings.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}
