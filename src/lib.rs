pub mod app;
pub mod color;
pub mod data;
pub mod export;
pub mod settings;
pub mod state;
pub mod ui;

pub use data::condition::{evaluate, Combinator, Condition, EvalOptions, Predicate, RowRange};
pub use data::filter::{compute_filtered_view, compute_highlights, HighlightMask, RangeOrigin};
pub use data::model::{CellValue, Dataset, Row};
pub use data::projection::project;
pub use data::reference::FieldResolution;
pub use data::store::RowStore;
