use thiserror::Error;

use super::model::{CellValue, Row};
use super::reference::{split_references, FieldResolution};

// ---------------------------------------------------------------------------
// Rule model
// ---------------------------------------------------------------------------

/// How the per-field checks of the secondary fields are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Every check must pass (vacuously true when there are none).
    #[default]
    All,
    /// At least one check must pass (false when there are none).
    Any,
}

impl Combinator {
    pub const VARIANTS: [Combinator; 2] = [Combinator::All, Combinator::Any];

    pub fn combine(self, mut checks: impl Iterator<Item = bool>) -> bool {
        match self {
            Combinator::All => checks.all(|c| c),
            Combinator::Any => checks.any(|c| c),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Combinator::All => "AND (all columns)",
            Combinator::Any => "OR (any column)",
        }
    }
}

/// Emptiness test applied to each secondary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predicate {
    #[default]
    IsEmpty,
    IsNonEmpty,
}

impl Predicate {
    pub const VARIANTS: [Predicate; 2] = [Predicate::IsEmpty, Predicate::IsNonEmpty];

    pub fn label(self) -> &'static str {
        match self {
            Predicate::IsEmpty => "is NULL / empty",
            Predicate::IsNonEmpty => "is not NULL",
        }
    }

    fn check(self, empty: bool) -> bool {
        match self {
            Predicate::IsEmpty => empty,
            Predicate::IsNonEmpty => !empty,
        }
    }
}

/// Inclusive 1-based row window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl RowRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse the two bounds leniently, reading the leading integer of each
    /// input. Digit runs too long for `i64` saturate.
    pub fn parse(from: &str, to: &str) -> Self {
        Self {
            from: parse_leading_int(from),
            to: parse_leading_int(to),
        }
    }

    /// Whether a zero-based position lies within `[from - 1, to - 1]`.
    pub fn contains_index(&self, index: usize) -> bool {
        let index = index as i64;
        let above = self.from.map_or(true, |from| index >= from.saturating_sub(1));
        let below = self.to.map_or(true, |to| index <= to.saturating_sub(1));
        above && below
    }
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    Some(match digits.parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    })
}

/// A fully configured highlight/filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    pub primary: String,
    pub secondary: Vec<String>,
    pub combinator: Combinator,
    pub predicate: Predicate,
    pub range: RowRange,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Knobs that differ between the live highlight path and the export path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// How field references are looked up.
    pub resolution: FieldResolution,
    /// Reject rows whose primary field is null or empty.
    pub require_primary: bool,
    /// Treat whitespace-only text as empty.
    pub trim: bool,
}

impl EvalOptions {
    /// Rendered-grid semantics: column letters, no primary check, trimmed text.
    pub fn highlight() -> Self {
        Self {
            resolution: FieldResolution::ByLetter,
            require_primary: false,
            trim: true,
        }
    }

    /// Export semantics: header names, primary must be present, raw values.
    pub fn export() -> Self {
        Self {
            resolution: FieldResolution::ByName,
            require_primary: true,
            trim: false,
        }
    }

    fn is_empty(&self, value: &CellValue) -> bool {
        if self.trim {
            value.is_blank()
        } else {
            value.is_empty()
        }
    }
}

/// Decide whether `row` qualifies under `condition`.
///
/// The row range is not consulted here; callers bound the window.
pub fn evaluate(row: &Row, condition: &Condition, options: &EvalOptions) -> bool {
    if options.require_primary {
        let primary = options.resolution.resolve(row, &condition.primary);
        if options.is_empty(primary) {
            return false;
        }
    }

    let checks = condition.secondary.iter().map(|field| {
        let value = options.resolution.resolve(row, field);
        condition.predicate.check(options.is_empty(value))
    });
    condition.combinator.combine(checks)
}

// ---------------------------------------------------------------------------
// Form inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("Please enter the primary column and columns to operate on.")]
    MissingPrimary,
    #[error("Please enter the primary column and columns to operate on.")]
    MissingSecondary,
}

/// The six raw inputs of the condition panel, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionForm {
    pub primary: String,
    pub secondary: String,
    pub combinator: Combinator,
    pub predicate: Predicate,
    pub range_from: String,
    pub range_to: String,
}

impl Default for ConditionForm {
    fn default() -> Self {
        Self {
            primary: String::new(),
            secondary: String::new(),
            combinator: Combinator::default(),
            predicate: Predicate::default(),
            range_from: "1".to_string(),
            range_to: String::new(),
        }
    }
}

impl ConditionForm {
    /// Build a condition without validation; used while the user is typing.
    pub fn to_condition(&self) -> Condition {
        Condition {
            primary: self.primary.trim().to_string(),
            secondary: split_references(&self.secondary),
            combinator: self.combinator,
            predicate: self.predicate,
            range: RowRange::parse(&self.range_from, &self.range_to),
        }
    }

    /// Build a condition for an explicit apply, which needs both field inputs.
    pub fn validate(&self) -> Result<Condition, ConditionError> {
        let condition = self.to_condition();
        if condition.primary.is_empty() {
            return Err(ConditionError::MissingPrimary);
        }
        if self.secondary.trim().is_empty() {
            return Err(ConditionError::MissingSecondary);
        }
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(fields: &[(&str, CellValue)]) -> Row {
        fields.iter().cloned().collect()
    }

    fn condition(secondary: &[&str], combinator: Combinator, predicate: Predicate) -> Condition {
        Condition {
            primary: "A".to_string(),
            secondary: secondary.iter().map(|s| s.to_string()).collect(),
            combinator,
            predicate,
            range: RowRange::default(),
        }
    }

    #[test]
    fn empty_secondary_list_follows_quantifier_semantics() {
        let r = row(&[("A", CellValue::Null)]);
        let mut opts = EvalOptions::export();
        opts.require_primary = false;

        let all = condition(&[], Combinator::All, Predicate::IsEmpty);
        let any = condition(&[], Combinator::Any, Predicate::IsEmpty);
        assert!(evaluate(&r, &all, &opts));
        assert!(!evaluate(&r, &any, &opts));
    }

    #[test]
    fn predicates_test_null_and_empty_string() {
        let opts = EvalOptions {
            require_primary: false,
            ..EvalOptions::export()
        };
        let is_empty = condition(&["B"], Combinator::All, Predicate::IsEmpty);
        let non_empty = condition(&["B"], Combinator::All, Predicate::IsNonEmpty);

        for value in [CellValue::Null, CellValue::from("")] {
            let r = row(&[("B", value)]);
            assert!(evaluate(&r, &is_empty, &opts));
            assert!(!evaluate(&r, &non_empty, &opts));
        }
        for value in [
            CellValue::from("x"),
            CellValue::from(" "),
            CellValue::Integer(0),
            CellValue::Bool(false),
        ] {
            let r = row(&[("B", value)]);
            assert!(!evaluate(&r, &is_empty, &opts));
            assert!(evaluate(&r, &non_empty, &opts));
        }
    }

    #[test]
    fn missing_field_reads_as_empty() {
        let r = row(&[("A", CellValue::Integer(1))]);
        let c = condition(&["nope"], Combinator::All, Predicate::IsEmpty);
        assert!(evaluate(&r, &c, &EvalOptions::export()));
    }

    #[test]
    fn primary_check_only_applies_when_required() {
        let r = row(&[("A", CellValue::from("")), ("B", CellValue::Null)]);
        let c = condition(&["B"], Combinator::All, Predicate::IsEmpty);
        assert!(!evaluate(&r, &c, &EvalOptions::export()));
        assert!(evaluate(&r, &c, &EvalOptions::highlight()));
    }

    #[test]
    fn highlight_options_trim_whitespace() {
        let r = row(&[("A", CellValue::Integer(1)), ("B", CellValue::from("  "))]);
        let c = condition(&["b"], Combinator::Any, Predicate::IsEmpty);
        assert!(evaluate(&r, &c, &EvalOptions::highlight()));
    }

    #[test]
    fn row_range_bounds_are_inclusive_and_one_based() {
        let range = RowRange::new(2, 3);
        assert!(!range.contains_index(0));
        assert!(range.contains_index(1));
        assert!(range.contains_index(2));
        assert!(!range.contains_index(3));

        let inverted = RowRange::new(3, 2);
        assert!((0..10).all(|i| !inverted.contains_index(i)));
    }

    #[test]
    fn unparsable_bounds_stay_open() {
        let range = RowRange::parse("", "abc");
        assert_eq!(range, RowRange::default());
        assert!(range.contains_index(10_000));

        assert_eq!(RowRange::parse(" 3rows", "+7"), RowRange::new(3, 7));
        assert_eq!(RowRange::parse("-2", "0"), RowRange::new(-2, 0));
    }

    #[test]
    fn oversized_bounds_saturate_instead_of_opening() {
        let range = RowRange::parse("99999999999999999999", "100");
        assert_eq!(range, RowRange::new(i64::MAX, 100));
        assert!(!range.contains_index(0));
        assert!(!range.contains_index(99));

        let range = RowRange::parse("-99999999999999999999", "99999999999999999999x");
        assert_eq!(range, RowRange::new(i64::MIN, i64::MAX));
        assert!(range.contains_index(0));
        assert!(range.contains_index(1_000_000));
    }

    #[test]
    fn validate_requires_both_field_inputs() {
        let mut form = ConditionForm::default();
        assert_eq!(form.validate(), Err(ConditionError::MissingPrimary));

        form.primary = "Name".to_string();
        form.secondary = " , ".to_string();
        assert!(form.validate().is_ok());

        form.secondary = "  ".to_string();
        assert_eq!(form.validate(), Err(ConditionError::MissingSecondary));

        form.secondary = "Email, Phone".to_string();
        form.range_to = "5".to_string();
        let condition = form.validate().unwrap();
        assert_eq!(condition.secondary, vec!["Email", "Phone"]);
        assert_eq!(condition.range, RowRange::new(1, 5));
    }
}
