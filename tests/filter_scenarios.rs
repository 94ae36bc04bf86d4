use pretty_assertions::assert_eq;
use sheet_sieve::{
    compute_filtered_view, compute_highlights, evaluate, project, CellValue, Combinator,
    Condition, Dataset, EvalOptions, FieldResolution, Predicate, RangeOrigin, Row, RowRange,
    RowStore,
};

fn row(fields: &[(&str, CellValue)]) -> Row {
    fields.iter().cloned().collect()
}

fn two_row_dataset() -> Dataset {
    Dataset::from_rows(vec![
        row(&[
            ("A", CellValue::Integer(1)),
            ("B", CellValue::from("")),
            ("C", CellValue::from("z")),
        ]),
        row(&[
            ("A", CellValue::Integer(2)),
            ("B", CellValue::from("y")),
            ("C", CellValue::from("")),
        ]),
    ])
}

fn non_empty_b_c(combinator: Combinator) -> Condition {
    Condition {
        primary: "A".to_string(),
        secondary: vec!["B".to_string(), "C".to_string()],
        combinator,
        predicate: Predicate::IsNonEmpty,
        range: RowRange::new(1, 2),
    }
}

#[test]
fn any_keeps_rows_with_one_filled_column() {
    let view = compute_filtered_view(
        &two_row_dataset(),
        &non_empty_b_c(Combinator::Any),
        &EvalOptions::export(),
    );
    assert_eq!(
        view,
        vec![
            row(&[
                ("A", CellValue::Integer(1)),
                ("B", CellValue::from("NULL")),
                ("C", CellValue::from("z")),
            ]),
            row(&[
                ("A", CellValue::Integer(2)),
                ("B", CellValue::from("y")),
                ("C", CellValue::from("NULL")),
            ]),
        ]
    );
}

#[test]
fn all_needs_every_column_filled() {
    let view = compute_filtered_view(
        &two_row_dataset(),
        &non_empty_b_c(Combinator::All),
        &EvalOptions::export(),
    );
    assert!(view.is_empty());
}

#[test]
fn projection_example() {
    let source = row(&[
        ("A", CellValue::Integer(1)),
        ("B", CellValue::Null),
        ("C", CellValue::from("x")),
    ]);
    let projected = project(
        &source,
        "A",
        &["B".to_string(), "C".to_string()],
        FieldResolution::ByName,
    );
    assert_eq!(
        projected,
        row(&[
            ("A", CellValue::Integer(1)),
            ("B", CellValue::from("NULL")),
            ("C", CellValue::from("x")),
        ])
    );
}

#[test]
fn empty_primary_excludes_row_from_export_only() {
    let ds = Dataset::from_rows(vec![row(&[("A", CellValue::Null), ("B", CellValue::Null)])]);
    let condition = Condition {
        primary: "A".to_string(),
        secondary: vec!["B".to_string()],
        combinator: Combinator::All,
        predicate: Predicate::IsEmpty,
        range: RowRange::new(1, 1),
    };

    assert!(compute_filtered_view(&ds, &condition, &EvalOptions::export()).is_empty());

    let mask = compute_highlights(
        &ds.columns,
        &ds.rows,
        &condition,
        &EvalOptions::highlight(),
        RangeOrigin::FirstDataRow,
    );
    assert_eq!(mask.rows, vec![true]);
}

#[test]
fn filtered_rows_never_leave_the_window() {
    let rows = (0..50)
        .map(|i| row(&[("id", CellValue::Integer(i)), ("v", CellValue::Null)]))
        .collect();
    let ds = Dataset::from_rows(rows);

    for (from, to) in [(1, 1), (5, 9), (40, 60), (10, 3), (0, 2), (-5, 0)] {
        let condition = Condition {
            primary: "id".to_string(),
            secondary: vec!["v".to_string()],
            combinator: Combinator::Any,
            predicate: Predicate::IsEmpty,
            range: RowRange::new(from, to),
        };
        let view = compute_filtered_view(&ds, &condition, &EvalOptions::export());
        for r in &view {
            let Some(CellValue::Integer(idx)) = r.get("id") else {
                panic!("id missing from {r:?}");
            };
            assert!(*idx >= from - 1 && *idx <= to - 1, "{idx} outside {from}..={to}");
        }
        if from > to {
            assert!(view.is_empty());
        }
    }
}

#[test]
fn evaluator_resolution_is_injectable() {
    let r = row(&[("name", CellValue::from("x")), ("email", CellValue::Null)]);
    let by_letter = Condition {
        primary: "A".to_string(),
        secondary: vec!["B".to_string()],
        ..Condition::default()
    };
    let by_name = Condition {
        primary: "name".to_string(),
        secondary: vec!["email".to_string()],
        ..Condition::default()
    };
    let letters = EvalOptions {
        resolution: FieldResolution::ByLetter,
        ..EvalOptions::export()
    };

    assert!(evaluate(&r, &by_letter, &letters));
    assert!(evaluate(&r, &by_name, &EvalOptions::export()));
    // Letters read as names miss the primary column entirely.
    assert!(!evaluate(&r, &by_letter, &EvalOptions::export()));
}

#[test]
fn store_view_replacement_is_wholesale() {
    let mut store = RowStore::new();
    store.load(two_row_dataset());
    let view = compute_filtered_view(
        store.dataset(),
        &non_empty_b_c(Combinator::Any),
        &EvalOptions::export(),
    );
    store.replace_view(view);
    assert_eq!(store.filtered_view().len(), 2);
    store.replace_view(Vec::new());
    assert!(store.filtered_view().is_empty());
    assert!(store.view_columns().is_empty());
    assert_eq!(store.dataset().len(), 2);
}
