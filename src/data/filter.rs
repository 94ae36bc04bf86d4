use super::condition::{evaluate, Condition, EvalOptions};
use super::model::{Dataset, Row};
use super::projection::project;

// ---------------------------------------------------------------------------
// Live highlight path
// ---------------------------------------------------------------------------

/// Which display row the 1-based range bounds count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeOrigin {
    /// Row 1 is the first data row; the header is never highlighted.
    #[default]
    FirstDataRow,
    /// Row 1 is the header row: bounds count rendered table rows, header
    /// included, so every data row shifts down by one.
    HeaderRow,
}

/// Highlight flags for the rendered grid, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMask {
    pub header: bool,
    pub rows: Vec<bool>,
}

impl HighlightMask {
    pub fn is_highlighted(&self, row: usize) -> bool {
        self.rows.get(row).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.rows.iter().filter(|&&h| h).count()
    }
}

/// Compute one highlight flag per displayed row of `rows`.
///
/// Rows outside the window are reset to `false`. Nothing is filtered out.
pub fn compute_highlights(
    columns: &[String],
    rows: &[Row],
    condition: &Condition,
    options: &EvalOptions,
    origin: RangeOrigin,
) -> HighlightMask {
    let header = match origin {
        RangeOrigin::FirstDataRow => false,
        RangeOrigin::HeaderRow => {
            let header_row: Row = columns
                .iter()
                .map(|c| (c.clone(), c.as_str()))
                .collect();
            condition.range.contains_index(0) && evaluate(&header_row, condition, options)
        }
    };

    let offset = match origin {
        RangeOrigin::FirstDataRow => 0,
        RangeOrigin::HeaderRow => 1,
    };

    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            condition.range.contains_index(i + offset) && evaluate(row, condition, options)
        })
        .collect();

    HighlightMask { header, rows }
}

// ---------------------------------------------------------------------------
// Export / filter path
// ---------------------------------------------------------------------------

/// Return the projected rows of `dataset` that fall in the window and pass
/// the condition, in dataset order.
pub fn compute_filtered_view(
    dataset: &Dataset,
    condition: &Condition,
    options: &EvalOptions,
) -> Vec<Row> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(idx, row)| {
            condition.range.contains_index(*idx) && evaluate(row, condition, options)
        })
        .map(|(_, row)| {
            project(
                row,
                &condition.primary,
                &condition.secondary,
                options.resolution,
            )
        })
        .collect()
}
