use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a local path or an `http(s)://` URL.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, first row is
///   the header (also used when a URL has no extension, e.g. a sheet export link)
/// * `.csv`     – header row, empty fields are null
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – scalar columns
pub fn load_source(reference: &str) -> Result<Dataset> {
    let reference = reference.trim();
    let (bytes, ext) = if is_remote(reference) {
        let bytes = fetch(reference)?;
        (bytes, url_extension(reference))
    } else {
        let path = Path::new(reference);
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        (Bytes::from(bytes), extension_of(path))
    };

    let dataset = load_bytes(bytes, &ext)?;
    log::debug!(
        "Parsed {} rows x {} columns from {reference}",
        dataset.len(),
        dataset.columns.len()
    );
    Ok(dataset)
}

/// Parse an in-memory file whose format is given by `ext` (without the dot).
pub fn load_bytes(bytes: Bytes, ext: &str) -> Result<Dataset> {
    match ext.to_ascii_lowercase().as_str() {
        "csv" => load_csv(&bytes),
        "json" => load_json(&bytes),
        "parquet" | "pq" => load_parquet(bytes),
        "" | "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => load_workbook(bytes),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn fetch(url: &str) -> Result<Bytes> {
    log::info!("Fetching {url}");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("fetching {url}"))?;
    response.bytes().context("reading response body")
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Extension of the last path segment of a URL, ignoring query and fragment.
fn url_extension(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let without_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    match without_scheme.split_once('/') {
        Some((_, path)) => extension_of(Path::new(path)),
        None => String::new(),
    }
}

/// Make header names unique: blanks become `__EMPTY`, repeats get `_1`, `_2`…
fn unique_header(cells: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();

    cells
        .into_iter()
        .map(|cell| {
            let base = if cell.is_empty() {
                "__EMPTY".to_string()
            } else {
                cell
            };
            let mut name = base.clone();
            while used.contains(&name) {
                let n = counters.entry(base.clone()).or_insert(0);
                *n += 1;
                name = format!("{base}_{n}");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read the first sheet of any workbook calamine understands.
fn load_workbook(bytes: Bytes) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).context("opening workbook")?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("Workbook contains no sheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet '{sheet_name}'"))?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Dataset::default().with_sheet_name(sheet_name));
    };
    let columns = unique_header(header_cells.iter().map(|c| workbook_cell(c).to_string()));

    let rows = sheet_rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let value = cells.get(i).map_or(CellValue::Null, workbook_cell);
                    (col.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset {
        columns,
        rows,
        sheet_name: Some(sheet_name),
    })
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => whole_float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => whole_float(d.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
        Data::Error(e) => CellValue::String(format!("{e:?}")),
    }
}

/// Spreadsheets store every number as a double; keep whole ones integral.
fn whole_float(f: f64) -> CellValue {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Float(f)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Short records are padded with nulls.
fn load_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers().context("reading CSV headers")?;
    let columns = unique_header(headers.iter().map(str::to_string));

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Row = columns
            .iter()
            .enumerate()
            .map(|(i, col)| (col.clone(), guess_cell_type(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    Ok(Dataset {
        columns,
        rows,
        sheet_name: None,
    })
}

/// Type a CSV field only when the typed value writes back as the exact same
/// text; anything else (`02134`, `1e3`, `NaN`, `true`) stays a string.
fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    let typed = if let Ok(i) = s.parse::<i64>() {
        CellValue::Integer(i)
    } else if let Ok(f) = s.parse::<f64>() {
        CellValue::Float(f)
    } else if s == "TRUE" || s == "FALSE" {
        CellValue::Bool(s == "TRUE")
    } else {
        return CellValue::String(s.to_string());
    };
    match &typed {
        CellValue::Float(f) if !f.is_finite() => CellValue::String(s.to_string()),
        _ if typed.to_csv_field() == s => typed,
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "name": "Ada", "email": null, "phone": "555-0100" },
///   ...
/// ]
/// ```
fn load_json(bytes: &[u8]) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        rows.push(obj.iter().map(|(k, v)| (k.clone(), json_to_cell(v))).collect());
    }

    Ok(Dataset::from_rows(rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file; every top-level column becomes a field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(bytes: Bytes) -> Result<Dataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(bytes).context("reading parquet metadata")?;
    let columns = unique_header(builder.schema().fields().iter().map(|f| f.name().clone()));
    let reader = builder.build().context("building parquet reader")?;

    let format = FormatOptions::default();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &format))
            .collect::<Result<Vec<_>, _>>()
            .context("preparing column formatters")?;

        for row in 0..batch.num_rows() {
            let values: Row = columns
                .iter()
                .zip(batch.columns())
                .zip(&formatters)
                .map(|((name, col), formatter)| {
                    (name.clone(), arrow_cell(col, row, || formatter.value(row).to_string()))
                })
                .collect();
            rows.push(values);
        }
    }

    Ok(Dataset {
        columns,
        rows,
        sheet_name: None,
    })
}

/// Extract a single value from an Arrow column at a given row. Types without
/// a native [`CellValue`] use the column's display formatting.
fn arrow_cell(col: &Arc<dyn Array>, row: usize, formatted: impl FnOnce() -> String) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            CellValue::Date(formatted())
        }
        _ => CellValue::String(formatted()),
    }
}
