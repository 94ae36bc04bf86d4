use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::data::model::{header_of, CellValue, Row};

/// File name used when the user leaves the name blank.
pub const DEFAULT_FILENAME: &str = "downloaded_file";

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const VARIANTS: [ExportFormat; 2] = [ExportFormat::Xlsx, ExportFormat::Csv];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel workbook (.xlsx)",
            ExportFormat::Csv => "CSV, UTF-8 (.csv)",
        }
    }
}

/// Build the output file name: blank input falls back to `default_name`, and
/// the format's extension is appended unless already present.
pub fn export_filename(name: &str, default_name: &str, format: ExportFormat) -> String {
    let name = name.trim();
    let name = if name.is_empty() { default_name } else { name };
    let ext = format.extension();
    let has_ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        name.to_string()
    } else {
        format!("{name}.{ext}")
    }
}

/// Write `rows` to `dir/filename` in the requested format and return the path.
pub fn export_rows(
    rows: &[Row],
    format: ExportFormat,
    dir: &Path,
    filename: &str,
    sheet_name: &str,
) -> Result<PathBuf> {
    let path = dir.join(filename);
    match format {
        ExportFormat::Csv => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(rows, file)?;
        }
        ExportFormat::Xlsx => {
            let mut workbook = build_workbook(rows, sheet_name)?;
            workbook
                .save(&path)
                .with_context(|| format!("saving {}", path.display()))?;
        }
    }
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write a header line followed by one record per row. Nulls are blank.
pub fn write_csv<W: Write>(rows: &[Row], writer: W) -> Result<()> {
    let header = header_of(rows);
    let mut wtr = csv::Writer::from_writer(writer);
    if !header.is_empty() {
        wtr.write_record(&header).context("writing CSV header")?;
    }
    for row in rows {
        let record: Vec<String> = header
            .iter()
            .map(|col| row.get(col).map(CellValue::to_csv_field).unwrap_or_default())
            .collect();
        wtr.write_record(&record).context("writing CSV record")?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// Largest magnitude a spreadsheet number (an `f64`) holds exactly.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A single-sheet workbook holding the header and `rows`. Integers too large
/// for a spreadsheet number are written as text.
pub fn build_workbook(rows: &[Row], sheet_name: &str) -> Result<Workbook> {
    let header = header_of(rows);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("invalid sheet name '{sheet_name}'"))?;

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (col, name) in header.iter().enumerate() {
            let col = col as u16;
            match row.get(name) {
                None | Some(CellValue::Null) => {}
                Some(CellValue::Integer(i)) if i.unsigned_abs() <= MAX_EXACT_INTEGER => {
                    worksheet.write_number(r, col, *i as f64)?;
                }
                Some(CellValue::Integer(i)) => {
                    worksheet.write_string(r, col, i.to_string())?;
                }
                Some(CellValue::Float(f)) => {
                    worksheet.write_number(r, col, *f)?;
                }
                Some(CellValue::Bool(b)) => {
                    worksheet.write_boolean(r, col, *b)?;
                }
                Some(CellValue::String(s)) | Some(CellValue::Date(s)) => {
                    worksheet.write_string(r, col, s)?;
                }
            }
        }
    }

    Ok(workbook)
}
