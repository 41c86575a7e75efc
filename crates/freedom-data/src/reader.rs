//! Spreadsheet decoding for the dashboard.
//!
//! Turns a file on disk into [`RawRow`]s: workbooks (xlsx, xls, ods, ...)
//! through `calamine`, delimited text through `csv`. Only the first sheet is
//! read and its first row names the columns.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use freedom_core::models::{CellValue, RawRow};
use freedom_core::{DashboardError, Result};
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

// ── SourceFormat ──────────────────────────────────────────────────────────────

/// Container format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    /// Decide from the file extension, falling back to sniffing `bytes`.
    pub fn detect(path: &Path, bytes: &[u8]) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") | Some("tsv") | Some("txt") => SourceFormat::Csv,
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                SourceFormat::Workbook
            }
            _ => Self::sniff(bytes),
        }
    }

    /// Zip and OLE containers are workbooks; anything else is read as CSV.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            SourceFormat::Workbook
        } else {
            SourceFormat::Csv
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => f.write_str("csv"),
            SourceFormat::Workbook => f.write_str("workbook"),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the whole file into memory.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode the first sheet of `bytes` into rows keyed by the header row.
///
/// Empty cells are left out of each row and rows with no values at all are
/// skipped. Columns with a blank header are dropped.
pub fn decode_rows(bytes: &[u8], format: SourceFormat) -> Result<Vec<RawRow>> {
    let rows = match format {
        SourceFormat::Workbook => decode_workbook(bytes)?,
        SourceFormat::Csv => decode_csv(bytes)?,
    };
    debug!(format = %format, rows = rows.len(), "decoded source rows");
    Ok(rows)
}

/// Read `path`, detect its format and decode it.
///
/// Returns the detected format alongside the rows.
pub fn load_rows(path: &Path) -> Result<(SourceFormat, Vec<RawRow>)> {
    let bytes = read_source(path)?;
    let format = SourceFormat::detect(path, &bytes);
    let rows = decode_rows(&bytes, format).map_err(|e| name_source(e, path))?;
    Ok((format, rows))
}

// ── Workbooks ─────────────────────────────────────────────────────────────────

fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let source = SourceFormat::Workbook.to_string();
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DashboardError::decode(&source, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::EmptySource(source.clone()))?
        .map_err(|e| DashboardError::decode(&source, e))?;

    let mut sheet_rows = range.rows();
    let header: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Err(DashboardError::EmptySource(source)),
    };
    ensure_header(&header, &source)?;

    let rows = sheet_rows
        .filter_map(|cells| build_row(&header, cells.iter().map(workbook_cell)))
        .collect();
    Ok(rows)
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let source = SourceFormat::Csv.to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::decode(&source, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    ensure_header(&header, &source)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DashboardError::decode(&source, e))?;
        let cells = record.iter().map(|field| {
            if field.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(field.to_string())
            }
        });
        if let Some(row) = build_row(&header, cells) {
            rows.push(row);
        }
    }
    Ok(rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn ensure_header(header: &[String], source: &str) -> Result<()> {
    if header.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::EmptySource(source.to_string()));
    }
    Ok(())
}

/// Zip one line of cells with the header; `None` when nothing is left.
fn build_row(header: &[String], cells: impl Iterator<Item = CellValue>) -> Option<RawRow> {
    let row: RawRow = header
        .iter()
        .zip(cells)
        .filter(|(name, cell)| !name.is_empty() && !cell.is_blank())
        .map(|(name, cell)| (name.clone(), cell))
        .collect();
    (!row.is_empty()).then_some(row)
}

/// Replace the format name in decode errors with the actual file path.
fn name_source(err: DashboardError, path: &Path) -> DashboardError {
    let name = path.display().to_string();
    match err {
        DashboardError::Decode { reason, .. } => DashboardError::Decode {
            source_name: name,
            reason,
        },
        DashboardError::EmptySource(_) => DashboardError::EmptySource(name),
        other => other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
