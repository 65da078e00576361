use calamine::{open_workbook_auto_from_rs, Data, Reader};
use sheetqa_core::{Error, Result};
use std::io::Cursor;

/// One parsed spreadsheet row: (column name, stringified value) pairs in
/// column order. Empty cells are omitted at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    #[must_use]
    pub fn from_pairs(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    /// Guess the format from a file name extension
    #[must_use]
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Parse tabular bytes into rows.
///
/// The first row is the header; every following row becomes one [`Row`]
/// keyed by those headers. Files with no header or no data rows are parse
/// errors, as are unreadable workbooks and undecodable CSV.
pub fn parse_table(bytes: &[u8], format: TableFormat) -> Result<Vec<Row>> {
    let rows = match format {
        TableFormat::Csv => parse_csv(bytes)?,
        TableFormat::Spreadsheet => parse_spreadsheet(bytes)?,
    };

    if rows.is_empty() {
        return Err(Error::Parse("file contains no data rows".to_string()));
    }
    Ok(rows)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Parse(format!("invalid CSV header: {e}")))?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(h, i))
        .collect();
    if headers.is_empty() {
        return Err(Error::Parse("CSV file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Parse(format!("invalid CSV record: {e}")))?;

        let fields: Vec<(String, String)> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();

        let row = Row::from_pairs(fields);
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<Row>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::Parse(format!("unreadable workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Parse("workbook has no sheets".to_string()))?
        .map_err(|e| Error::Parse(format!("unreadable sheet: {e}")))?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .ok_or_else(|| Error::Parse("sheet has no header row".to_string()))?
        .iter()
        .enumerate()
        .map(|(i, cell)| header_name(&cell_text(cell).unwrap_or_default(), i))
        .collect();

    let mut rows = Vec::new();
    for cells in row_iter {
        let fields: Vec<(String, String)> = headers
            .iter()
            .zip(cells.iter())
            .filter_map(|(header, cell)| cell_text(cell).map(|text| (header.clone(), text)))
            .collect();

        let row = Row::from_pairs(fields);
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn header_name(raw: &str, position: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("column_{position}")
    } else {
        trimmed.to_string()
    }
}

/// Stringify one cell. Integral floats render without a decimal point, the
/// way a numeric spreadsheet column reads. Empty and error cells yield None.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        other => Some(other.to_string()),
    }
}

fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
