use super::model::{CellValue, Row};

// ---------------------------------------------------------------------------
// Field references
// ---------------------------------------------------------------------------

/// How a field reference such as `"B"` or `"Amount"` is looked up in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldResolution {
    /// Exact match against the header name.
    #[default]
    ByName,
    /// Column letters giving the zero-based position (`A` → 0, `AA` → 26).
    ByLetter,
}

impl FieldResolution {
    /// Resolve `reference` in `row`. Anything that does not resolve reads as null.
    pub fn resolve<'r>(&self, row: &'r Row, reference: &str) -> &'r CellValue {
        const NULL: &CellValue = &CellValue::Null;
        let found = match self {
            FieldResolution::ByName => row.get(reference),
            FieldResolution::ByLetter => column_index(reference).and_then(|i| row.get_index(i)),
        };
        found.unwrap_or(NULL)
    }
}

/// Parse spreadsheet column letters into a zero-based index.
///
/// Letters are base-26 and case-insensitive, so `"a"`, `"Z"` and `"aa"` give
/// 0, 25 and 26. Surrounding whitespace is ignored; anything else that is not
/// an ASCII letter yields `None`.
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }
    let mut index: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Inverse of [`column_index`]: 0 → `"A"`, 26 → `"AA"`.
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut c = index + 1;
    while c > 0 {
        let rem = (c - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        c = (c - 1) / 26;
    }
    letters.reverse();
    letters.into_iter().collect()
}

/// Split a comma-separated reference list, trimming each entry and dropping
/// blanks left by stray commas.
pub fn split_references(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
