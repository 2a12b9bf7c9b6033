use serde_json::Value;

use crate::column::Column;

/// Display value for a missing cell.
pub const EMPTY_CELL: &str = "∅";

pub type Row = Vec<String>;

/// Rows of display strings, aligned by position with the header columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tabular {
    rows: Vec<Row>,
}

impl Tabular {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds rows from JSON records.
    ///
    /// Keyed records are looked up by column id, falling back to the text name.
    /// Positional records are taken as they are.
    pub fn from_records(records: &[Value], columns: &[Column]) -> Self {
        let rows = records
            .iter()
            .map(|record| match record {
                Value::Object(map) => columns
                    .iter()
                    .map(|c| {
                        let value = map
                            .get(&c.id)
                            .or_else(|| c.name.as_text().and_then(|name| map.get(name)));
                        display_value(value)
                    })
                    .collect(),
                Value::Array(values) => values.iter().map(|v| display_value(Some(v))).collect(),
                other => vec![display_value(Some(other))],
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A copy of at most the first `n` rows.
    pub fn head(&self, n: usize) -> Tabular {
        Tabular {
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Renders a value on a single line.
pub fn display_value(value: Option<&Value>) -> String {
    let s = match value {
        None | Some(Value::Null) => return EMPTY_CELL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    single_line(&s)
}

pub fn single_line(s: &str) -> String {
    s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")
}
