use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what a spreadsheet cell can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl CellValue {
    /// Null or the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Like [`CellValue::is_empty`] but whitespace-only text also counts.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::String(s) => s.trim().is_empty(),
            other => other.is_empty(),
        }
    }

    /// Text written for this cell in a CSV field. Whole floats keep a `.0`
    /// and booleans are upper-case, so the text reads back as the same value.
    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            other => other.to_string(),
        }
    }

    /// Text shown for this cell in the grid; empties render as `marker`.
    pub fn display_or<'a>(&self, marker: &'a str) -> std::borrow::Cow<'a, str> {
        if self.is_empty() {
            std::borrow::Cow::Borrowed(marker)
        } else {
            std::borrow::Cow::Owned(self.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Row – an ordered field name → value mapping
// ---------------------------------------------------------------------------

/// One record of a sheet. Field order is significant: column letters index it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Look up a field by zero-based position.
    pub fn get_index(&self, index: usize) -> Option<&CellValue> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// Insert or overwrite a field. An existing key keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.set(key, value);
        }
        row
    }
}

/// Union of the field names of `rows`, in first-appearance order.
pub fn header_of(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed sheet: header plus rows, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Ordered column names (the header row).
    pub columns: Vec<String>,
    /// All rows, each carrying every header field.
    pub rows: Vec<Row>,
    /// Name of the sheet the rows came from, if the source had sheets.
    pub sheet_name: Option<String>,
}

impl Dataset {
    /// Build a dataset from rows; the header is the union of row keys in
    /// first-appearance order and every row is padded to it with nulls.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = header_of(&rows);
        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| (col.clone(), row.get(col).cloned().unwrap_or(CellValue::Null)))
                    .collect()
            })
            .collect();

        Dataset {
            columns,
            rows,
            sheet_name: None,
        }
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
