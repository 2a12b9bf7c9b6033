use std::fs;
use std::path::Path;

use derive_setters::Setters;
use serde::Deserialize;
use serde_json::Value;

use crate::column::ColumnEntry;
use crate::domain::GridError;

/// Upper bound for a column measured by the shadow render.
pub const DEFAULT_MAX_COLUMN_WIDTH: u16 = 40;

/// Global table configuration.
///
/// Only one of `from`, `columns` and `data` is used to derive the columns, in
/// that order of precedence.
#[derive(Debug, Clone, Deserialize, Setters)]
#[serde(default, rename_all = "camelCase")]
#[setters(prefix = "with_")]
pub struct GridConfig {
    /// Enable sorting on every column that does not say otherwise.
    pub sort: bool,
    pub fixed_header: bool,
    pub auto_width: bool,
    pub max_column_width: u16,
    #[setters(strip_option)]
    pub columns: Option<Vec<ColumnEntry>>,
    #[setters(strip_option)]
    pub data: Option<Vec<Value>>,
    /// HTML markup holding a table with a `thead` section.
    #[setters(strip_option, into)]
    pub from: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sort: false,
            fixed_header: false,
            auto_width: true,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            columns: None,
            data: None,
            from: None,
        }
    }
}

impl GridConfig {
    pub fn from_json_str(s: &str) -> Result<Self, GridError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, GridError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = GridConfig::default();
        assert!(cfg.auto_width);
        assert!(!cfg.sort);
        assert_eq!(cfg.max_column_width, DEFAULT_MAX_COLUMN_WIDTH);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GridConfig::from_json_str(
            r#"{"sort": true, "columns": ["Name", {"name": "Age", "sort": false}]}"#,
        )
        .unwrap();
        assert!(cfg.sort);
        assert!(cfg.auto_width);
        assert_eq!(cfg.columns.map(|c| c.len()), Some(2));
    }

    #[test]
    fn setters() {
        let cfg = GridConfig::default()
            .with_fixed_header(true)
            .with_from("<table></table>");
        assert!(cfg.fixed_header);
        assert_eq!(cfg.from.as_deref(), Some("<table></table>"));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            GridConfig::from_json_str("{\"sort\": 3}"),
            Err(GridError::ConfigError(_))
        ));
    }
}
