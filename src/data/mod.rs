/// Data layer: core types, loading, condition evaluation and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet  (path or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  Dataset + current filtered view
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐      ┌────────────┐
///   │  filter   │ ───▶ │ condition │ ───▶ │ reference  │
///   └──────────┘      └───────────┘      └────────────┘
///        │  highlight mask  /  qualifying rows
///        ▼
///   ┌────────────┐
///   │ projection │  primary + secondary fields, empties → "NULL"
///   └────────────┘
/// ```

pub mod condition;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
pub mod reference;
pub mod store;
