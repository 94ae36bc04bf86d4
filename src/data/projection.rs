use super::model::{CellValue, Row};
use super::reference::FieldResolution;

/// Literal written in place of null or empty secondary values.
pub const NULL_MARKER: &str = "NULL";

/// Reduce `row` to the primary field followed by the secondary fields.
///
/// Output keys are the references exactly as given. The primary value is
/// copied untouched; secondary values that are null or empty become
/// [`NULL_MARKER`]. A reference that appears twice keeps its first position
/// and takes the later value.
pub fn project(
    row: &Row,
    primary: &str,
    secondary: &[String],
    resolution: FieldResolution,
) -> Row {
    let mut out = Row::new();
    out.set(primary, resolution.resolve(row, primary).clone());
    for field in secondary {
        let value = resolution.resolve(row, field);
        let value = if value.is_empty() {
            CellValue::from(NULL_MARKER)
        } else {
            value.clone()
        };
        out.set(field.as_str(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substitutes_marker_for_empty_secondaries() {
        let row: Row = [
            ("A", CellValue::Integer(1)),
            ("B", CellValue::Null),
            ("C", CellValue::from("x")),
            ("D", CellValue::from("dropped")),
        ]
        .into_iter()
        .collect();

        let projected = project(&row, "A", &strings(&["B", "C"]), FieldResolution::ByName);
        let expected: Row = [
            ("A", CellValue::Integer(1)),
            ("B", CellValue::from("NULL")),
            ("C", CellValue::from("x")),
        ]
        .into_iter()
        .collect();
        assert_eq!(projected, expected);
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn output_order_follows_references() {
        let row: Row = [
            ("A", CellValue::Integer(1)),
            ("B", CellValue::from("b")),
            ("C", CellValue::from("c")),
        ]
        .into_iter()
        .collect();
        let projected = project(&row, "B", &strings(&["C", "A"]), FieldResolution::ByName);
        assert_eq!(projected.names().collect::<Vec<_>>(), vec!["B", "C", "A"]);
    }

    #[test]
    fn missing_fields_project_as_null() {
        let row: Row = [("A", CellValue::from(""))].into_iter().collect();
        let projected = project(&row, "Z", &strings(&["Y"]), FieldResolution::ByName);
        assert_eq!(projected.get("Z"), Some(&CellValue::Null));
        assert_eq!(projected.get("Y"), Some(&CellValue::from("NULL")));
    }

    #[test]
    fn repeated_reference_keeps_first_position() {
        let row: Row = [("A", CellValue::from("")), ("B", CellValue::from("b"))]
            .into_iter()
            .collect();
        let projected = project(&row, "A", &strings(&["B", "A"]), FieldResolution::ByName);
        assert_eq!(projected.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(projected.get("A"), Some(&CellValue::from("NULL")));
    }

    #[test]
    fn letter_resolution_keys_by_reference() {
        let row: Row = [("id", CellValue::Integer(3)), ("mail", CellValue::Null)]
            .into_iter()
            .collect();
        let projected = project(&row, "A", &strings(&["B"]), FieldResolution::ByLetter);
        assert_eq!(projected.get("A"), Some(&CellValue::Integer(3)));
        assert_eq!(projected.get("B"), Some(&CellValue::from("NULL")));
    }
}
