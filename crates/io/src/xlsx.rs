// Spreadsheet import (xlsx, xlsm, xls, xlsb, ods) and result export (xlsx only)
//
// Import: reads one sheet positionally. The header row is taken on trust;
//         nothing checks that it actually holds labels.
// Export: one worksheet per field, written atomically.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::Timelike;
use packmatch_recon::config::SourceConfig;
use packmatch_recon::model::{FieldMatches, RawValue, SheetPlan};
use packmatch_recon::source::TabularSource;
use packmatch_recon::MatchError;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// One sheet, read fully into memory: labels from the header row and the
/// rows below it. The workbook file is closed once `open` returns.
#[derive(Debug, Clone)]
pub struct XlsxSheet {
    path: PathBuf,
    sheet_name: String,
    header_row: u32,
    labels: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl XlsxSheet {
    pub fn open(path: &Path, source: &SourceConfig) -> Result<Self, MatchError> {
        let unreadable = |reason: String| MatchError::UnreadableTabularSource {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let sheet_name = sheet_names.get(source.sheet_index).cloned().ok_or_else(|| {
            unreadable(format!(
                "workbook has {} sheet(s), sheet index {} does not exist",
                sheet_names.len(),
                source.sheet_index
            ))
        })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| unreadable(format!("sheet '{sheet_name}': {e}")))?;

        let (labels, rows) = split_at_header(&range, source.header_row);
        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            columns = labels.len(),
            rows = rows.len(),
            "read sheet"
        );

        Ok(Self {
            path: path.to_path_buf(),
            sheet_name,
            header_row: source.header_row,
            labels,
            rows,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl TabularSource for XlsxSheet {
    fn source_name(&self) -> String {
        format!("{} [{}]", self.path.display(), self.sheet_name)
    }

    fn header_row(&self) -> u32 {
        self.header_row
    }

    fn columns(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn column(&self, name: &str) -> Option<Vec<RawValue>> {
        let idx = self.labels.iter().position(|l| l == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or(RawValue::Empty))
                .collect(),
        )
    }
}

/// Labels from the 1-based `header_row`, data from every row below it.
/// Rows above the header are skipped.
fn split_at_header(range: &Range<Data>, header_row: u32) -> (Vec<String>, Vec<Vec<RawValue>>) {
    let header_idx = header_row.saturating_sub(1);
    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut header: Option<&[Data]> = None;
    let mut rows = Vec::new();
    for (row_idx, row) in range.rows().enumerate() {
        let abs_row = start_row + row_idx as u32;
        if abs_row == header_idx {
            header = Some(row);
        } else if abs_row > header_idx {
            rows.push(row.iter().map(raw_value).collect());
        }
    }

    let labels = match header {
        Some(cells) => header_labels(cells, start_col),
        None => {
            warn!(header_row, "header row lies outside the sheet's used range");
            Vec::new()
        }
    };

    (labels, rows)
}

/// Blank header cells become `Unnamed: <col>`; a repeated label gets `.1`,
/// `.2`, ... so the first occurrence keeps the exact name.
fn header_labels(cells: &[Data], start_col: u32) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(cells.len());

    for (col_idx, cell) in cells.iter().enumerate() {
        let mut label = match raw_value(cell) {
            RawValue::Empty => format!("Unnamed: {}", start_col as usize + col_idx),
            value => value.to_string(),
        };

        let count = seen.entry(label.clone()).or_insert(0);
        if *count > 0 {
            warn!(label = %label, "duplicate header label");
            label = format!("{label}.{count}");
        }
        *count += 1;
        labels.push(label);
    }

    labels
}

fn raw_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Float(n) => RawValue::Float(*n),
        Data::Int(n) => RawValue::Int(*n),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => datetime_value(dt),
        // Durations stay numeric (fractional days)
        Data::DateTime(dt) => RawValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
    }
}

/// Date cells as `YYYY-MM-DD HH:MM:SS` (fraction only when present); time-only
/// cells as `HH:MM:SS`. Falls back to the serial number when the value is
/// outside chrono's range.
fn datetime_value(dt: &ExcelDateTime) -> RawValue {
    let Some(stamp) = dt.as_datetime() else {
        return RawValue::Float(dt.as_f64());
    };
    let text = if dt.as_f64() < 1.0 {
        stamp.time().format("%H:%M:%S").to_string()
    } else if stamp.nanosecond() == 0 {
        stamp.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        stamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    };
    RawValue::Text(text)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Summary of a finished export.
#[derive(Debug, Default, Clone)]
pub struct ExportResult {
    pub sheets_exported: usize,
    pub values_exported: usize,
}

/// Write one sheet per plan entry: a bold `Matched <field>` heading in A1
/// and the field's matched tokens below it.
///
/// The workbook is assembled in memory, written to a temporary file beside
/// `destination`, then renamed over it. On failure the temporary file is
/// removed and `destination` is left as it was.
pub fn export_matches(
    sheets: &[SheetPlan],
    results: &[FieldMatches],
    destination: &Path,
) -> Result<ExportResult, MatchError> {
    let write_err = |reason: String| MatchError::OutputWrite {
        path: destination.to_path_buf(),
        reason,
    };
    let xlsx_err = |e: XlsxError| write_err(e.to_string());

    let mut result = ExportResult::default();
    let mut xlsx_workbook = XlsxWorkbook::new();
    let heading = Format::new().set_bold();

    for plan in sheets {
        let matched: Vec<&String> = results
            .iter()
            .find(|r| r.field == plan.field)
            .map(|r| r.matched.iter().collect())
            .unwrap_or_default();

        let worksheet = xlsx_workbook
            .add_worksheet()
            .set_name(&plan.label)
            .map_err(|e| write_err(format!("sheet '{}': {}", plan.label, e)))?;

        let title = format!("Matched {}", plan.field);
        worksheet
            .write_string_with_format(0, 0, &title, &heading)
            .map_err(xlsx_err)?;

        let mut widest = title.chars().count();
        for (i, token) in matched.iter().enumerate() {
            worksheet
                .write_string(i as u32 + 1, 0, token.as_str())
                .map_err(xlsx_err)?;
            widest = widest.max(token.chars().count());
        }
        worksheet
            .set_column_width(0, (widest + 2).min(80) as f64)
            .map_err(xlsx_err)?;

        result.sheets_exported += 1;
        result.values_exported += matched.len();
    }

    let buffer = xlsx_workbook.save_to_buffer().map_err(xlsx_err)?;

    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".packmatch-")
        .suffix(".xlsx.tmp")
        .tempfile_in(dir)
        .map_err(|e| write_err(format!("cannot create temporary file in {}: {e}", dir.display())))?;
    tmp.write_all(&buffer).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| write_err(e.to_string()))?;
    tmp.persist(destination)
        .map_err(|e| write_err(format!("cannot replace destination: {}", e.error)))?;

    debug!(
        path = %destination.display(),
        sheets = result.sheets_exported,
        values = result.values_exported,
        "wrote results"
    );
    Ok(result)
}
