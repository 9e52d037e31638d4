//! Tabular file ingestion
//!
//! Converts an uploaded file's raw bytes plus its original filename into a
//! normalized `{ rows, columns }` structure. The filename extension alone
//! selects the parsing strategy; MIME types are informative only. Rows are
//! fully materialized because downstream consumers (preview, chart shaping,
//! AI context) need random access and length.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::UploadConfig;
use crate::errors::{IngestError, IngestResult};

/// One parsed data row: header name -> cell value, in column order.
pub type Row = IndexMap<String, Value>;

/// Parsed upload: the derived column schema and every data row.
#[derive(Debug, Clone, Serialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TabularData {
    fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Supported upload formats, resolved once from the filename so every
/// recognized kind is handled exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    /// Resolve the format from the substring after the last `.`,
    /// case-insensitively.
    pub fn from_filename(filename: &str) -> IngestResult<Self> {
        let extension = filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }
}

/// Parse an uploaded file into rows and columns.
///
/// Pure transformation over the byte buffer: parsing the same bytes and
/// filename twice yields structurally equal results. An empty but well-formed
/// file produces empty rows rather than an error.
pub fn parse_tabular_file(
    bytes: &[u8],
    filename: &str,
    config: &UploadConfig,
) -> IngestResult<TabularData> {
    if bytes.len() > config.max_bytes {
        return Err(IngestError::TooLarge {
            size: bytes.len(),
            max: config.max_bytes,
        });
    }

    let kind = FileKind::from_filename(filename)?;

    // Deployments may narrow the accepted set below the built-in formats.
    if !config
        .allowed_extensions
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(kind.as_str()))
    {
        return Err(IngestError::UnsupportedFormat {
            extension: kind.as_str().to_string(),
        });
    }

    match kind {
        FileKind::Csv => parse_csv(bytes),
        FileKind::Xlsx | FileKind::Xls => parse_workbook(bytes, kind),
    }
}

fn parse_csv(bytes: &[u8]) -> IngestResult<TabularData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|err| IngestError::parse("csv", err.to_string()))?
        .iter()
        .map(|field| field.to_string())
        .collect();

    // A byte-empty file has no header row either; report it as a valid,
    // empty dataset.
    if columns.is_empty() {
        return Ok(TabularData::empty());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| IngestError::parse("csv", err.to_string()))?;
        let row: Row = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cell = record.get(i).unwrap_or_default();
                (name.clone(), Value::String(cell.to_string()))
            })
            .collect();
        rows.push(row);
    }

    Ok(TabularData { columns, rows })
}

fn parse_workbook(bytes: &[u8], kind: FileKind) -> IngestResult<TabularData> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|err| IngestError::parse(kind.as_str(), err.to_string()))?;

    // Sheet selection is positional: always the first sheet.
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(TabularData::empty());
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|err| IngestError::parse(kind.as_str(), err.to_string()))?;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(TabularData::empty());
    };

    let columns: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();

    let rows: Vec<Row> = sheet_rows
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = cells.get(i).map(cell_to_value).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(TabularData { columns, rows })
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        Data::Error(_) => Value::Null,
        // Dates and durations keep their display form; charting treats them
        // as labels anyway.
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UploadConfig {
        UploadConfig::default()
    }

    #[test]
    fn csv_header_and_rows() {
        let input = b"name,score\nAda,90\nLin,\nKay,70\n";
        let parsed = parse_tabular_file(input, "grades.csv", &config()).unwrap();

        assert_eq!(parsed.columns, vec!["name", "score"]);
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rows[0]["name"], Value::String("Ada".into()));
        assert_eq!(parsed.rows[1]["score"], Value::String("".into()));
        assert_eq!(parsed.rows[2]["score"], Value::String("70".into()));
    }

    #[test]
    fn csv_header_only_is_not_an_error() {
        let parsed = parse_tabular_file(b"name,score\n", "empty.csv", &config()).unwrap();
        assert_eq!(parsed.columns, vec!["name", "score"]);
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn csv_empty_file_yields_empty_dataset() {
        let parsed = parse_tabular_file(b"", "nothing.csv", &config()).unwrap();
        assert!(parsed.columns.is_empty());
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn csv_ragged_rows_are_padded() {
        let parsed = parse_tabular_file(b"a,b,c\n1,2\n", "ragged.csv", &config()).unwrap();
        assert_eq!(parsed.rows[0]["c"], Value::String("".into()));
    }

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(FileKind::from_filename("DATA.CSV").unwrap(), FileKind::Csv);
        assert_eq!(
            FileKind::from_filename("book.XlSx").unwrap(),
            FileKind::Xlsx
        );
        assert_eq!(FileKind::from_filename("old.XLS").unwrap(), FileKind::Xls);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_tabular_file(b"x", "report.pdf", &config()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));

        let err = FileKind::from_filename("noextension").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn narrowed_allowlist_rejects_recognized_kind() {
        let config = UploadConfig {
            allowed_extensions: vec!["csv".to_string()],
            ..UploadConfig::default()
        };
        let err = parse_tabular_file(b"x", "book.xlsx", &config).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let config = UploadConfig {
            max_bytes: 4,
            ..UploadConfig::default()
        };
        let err = parse_tabular_file(b"name,score\n", "grades.csv", &config).unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { size: 11, max: 4 }));
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = b"city,pop\nOslo,700000\nBergen,280000\n";
        let first = parse_tabular_file(input, "cities.csv", &config()).unwrap();
        let second = parse_tabular_file(input, "cities.csv", &config()).unwrap();
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn workbook_first_sheet_with_typed_cells() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("grades").unwrap();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "score").unwrap();
        sheet.write_string(0, 2, "passed").unwrap();
        sheet.write_string(1, 0, "Ada").unwrap();
        sheet.write_number(1, 1, 90.0).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        // Row with a hole in the middle: score stays unwritten.
        sheet.write_string(2, 0, "Lin").unwrap();
        sheet.write_boolean(2, 2, false).unwrap();

        // A second sheet that must be ignored: selection is positional.
        let other = workbook.add_worksheet();
        other.set_name("notes").unwrap();
        other.write_string(0, 0, "ignored").unwrap();

        let bytes = workbook.save_to_buffer().unwrap();
        let parsed = parse_tabular_file(&bytes, "grades.xlsx", &config()).unwrap();

        assert_eq!(parsed.columns, vec!["name", "score", "passed"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0]["name"], Value::String("Ada".into()));
        assert_eq!(parsed.rows[0]["score"], Value::from(90.0));
        assert_eq!(parsed.rows[0]["passed"], Value::Bool(true));
        assert_eq!(parsed.rows[1]["score"], Value::Null);
    }

    #[test]
    fn malformed_workbook_is_a_parse_error() {
        // Not a zip archive, so calamine cannot open it.
        let err = parse_tabular_file(b"definitely not a workbook", "data.xlsx", &config())
            .unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}
