use super::model::{header_of, Dataset, Row};

/// Holds the loaded dataset and the view derived from it.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    dataset: Dataset,
    view: Vec<Row>,
    view_columns: Vec<String>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset; the view starts out as a copy of all its rows.
    pub fn load(&mut self, dataset: Dataset) {
        self.view = dataset.rows.clone();
        self.view_columns = dataset.columns.clone();
        self.dataset = dataset;
    }

    /// Replace the view wholesale.
    pub fn replace_view(&mut self, rows: Vec<Row>) {
        self.view_columns = header_of(&rows);
        self.view = rows;
    }

    /// Drop any applied filter and show every row again.
    pub fn reset_view(&mut self) {
        self.view = self.dataset.rows.clone();
        self.view_columns = self.dataset.columns.clone();
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filtered_view(&self) -> &[Row] {
        &self.view
    }

    /// Header of the current view, in display order.
    pub fn view_columns(&self) -> &[String] {
        &self.view_columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        Dataset::from_rows(vec![
            [("A", CellValue::Integer(1)), ("B", CellValue::Null)]
                .into_iter()
                .collect(),
            [("A", CellValue::Integer(2)), ("B", CellValue::from("y"))]
                .into_iter()
                .collect(),
        ])
    }

    #[test]
    fn load_resets_view_to_full_dataset() {
        let mut store = RowStore::new();
        store.replace_view(vec![Row::new()]);
        store.load(dataset());
        assert_eq!(store.filtered_view(), store.dataset().rows.as_slice());
        assert_eq!(store.view_columns(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn replace_view_does_not_touch_dataset() {
        let mut store = RowStore::new();
        store.load(dataset());
        let projected: Row = [("B", CellValue::from("NULL"))].into_iter().collect();
        store.replace_view(vec![projected]);
        assert_eq!(store.view_columns(), ["B".to_string()]);
        assert_eq!(store.dataset().len(), 2);

        store.reset_view();
        assert_eq!(store.filtered_view().len(), 2);
    }

    #[test]
    fn second_load_overwrites_first() {
        let mut store = RowStore::new();
        store.load(dataset());
        store.load(Dataset::default());
        assert!(store.dataset().is_empty());
        assert!(store.filtered_view().is_empty());
    }
}
