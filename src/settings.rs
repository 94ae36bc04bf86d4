use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::RangeOrigin;
use crate::data::projection::NULL_MARKER;
use crate::export::DEFAULT_FILENAME;

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background of highlighted rows, as `#rrggbb`.
    pub highlight_color: String,
    /// Text shown for null or empty cells in the grid.
    pub null_marker: String,
    /// Export file name used when none is entered.
    pub default_filename: String,
    /// Sheet name for exported workbooks when the source had none.
    pub default_sheet_name: String,
    /// Whether range bounds count from the header row or the first data row.
    pub range_origin: RangeOriginSetting,
    pub row_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangeOriginSetting {
    #[default]
    FirstDataRow,
    HeaderRow,
}

impl From<RangeOriginSetting> for RangeOrigin {
    fn from(value: RangeOriginSetting) -> Self {
        match value {
            RangeOriginSetting::FirstDataRow => RangeOrigin::FirstDataRow,
            RangeOriginSetting::HeaderRow => RangeOrigin::HeaderRow,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_color: "#d1e7dd".to_string(),
            null_marker: NULL_MARKER.to_string(),
            default_filename: DEFAULT_FILENAME.to_string(),
            default_sheet_name: "Sheet1".to_string(),
            range_origin: RangeOriginSetting::default(),
            row_height: 20.0,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        log::debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }
}
