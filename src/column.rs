use derive_setters::Setters;
use ratatui::text::Line;
use serde::{Deserialize, Deserializer};

use crate::width::WidthSpec;

/// A column label. Either plain text or a styled line supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnName {
    Text(String),
    Fragment(Line<'static>),
}

impl ColumnName {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnName::Text(s) => Some(s),
            ColumnName::Fragment(_) => None,
        }
    }

    pub fn to_line(&self) -> Line<'static> {
        match self {
            ColumnName::Text(s) => Line::raw(s.clone()),
            ColumnName::Fragment(line) => line.clone(),
        }
    }
}

impl From<&str> for ColumnName {
    fn from(s: &str) -> Self {
        ColumnName::Text(s.to_string())
    }
}

impl From<String> for ColumnName {
    fn from(s: String) -> Self {
        ColumnName::Text(s)
    }
}

impl From<Line<'static>> for ColumnName {
    fn from(line: Line<'static>) -> Self {
        ColumnName::Fragment(line)
    }
}

impl<'de> Deserialize<'de> for ColumnName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ColumnName::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

/// Optional sort settings a column can carry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    pub enabled: Option<bool>,
    pub direction: Option<SortDirection>,
    /// Compare values as numbers instead of strings.
    pub numeric: Option<bool>,
}

/// Sort configuration as written by the user, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SortSpec {
    /// Not mentioned at all, the global flag decides.
    #[default]
    Unset,
    /// `false` or `null`.
    Disabled,
    /// `true`.
    Enabled,
    Settings(SortSettings),
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Number(f64),
            Text(String),
            Settings(SortSettings),
        }

        // Falsy values (`false`, `null`, `0`, `""`) disable sorting, any other
        // scalar enables it.
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Flag(false)) => SortSpec::Disabled,
            Some(Raw::Number(n)) if n == 0.0 => SortSpec::Disabled,
            Some(Raw::Text(t)) if t.is_empty() => SortSpec::Disabled,
            Some(Raw::Flag(true) | Raw::Number(_) | Raw::Text(_)) => SortSpec::Enabled,
            Some(Raw::Settings(s)) => SortSpec::Settings(s),
        })
    }
}

/// Normalized sort configuration of a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort {
    pub enabled: bool,
    pub settings: SortSettings,
}

/// A column as supplied by configuration. Every field except the name may be
/// missing until the defaulting passes have run.
#[derive(Debug, Clone, PartialEq, Deserialize, Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_")]
pub struct ColumnSpec {
    #[serde(default)]
    #[setters(strip_option, into)]
    pub id: Option<String>,
    #[setters(into)]
    pub name: ColumnName,
    #[serde(default)]
    pub width: WidthSpec,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    #[setters(strip_option)]
    pub fixed_header: Option<bool>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<ColumnName>) -> Self {
        Self {
            id: None,
            name: name.into(),
            width: WidthSpec::Unset,
            sort: SortSpec::Unset,
            fixed_header: None,
        }
    }
}

/// One entry of an explicit column list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEntry")]
pub enum ColumnEntry {
    Text(String),
    Fragment(Line<'static>),
    Full(ColumnSpec),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Text(String),
    Full(ColumnSpec),
}

impl From<RawEntry> for ColumnEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Text(s) => ColumnEntry::Text(s),
            RawEntry::Full(spec) => ColumnEntry::Full(spec),
        }
    }
}

impl From<ColumnEntry> for ColumnSpec {
    fn from(entry: ColumnEntry) -> Self {
        match entry {
            ColumnEntry::Text(s) => ColumnSpec::new(s),
            ColumnEntry::Fragment(line) => ColumnSpec::new(line),
            ColumnEntry::Full(spec) => spec,
        }
    }
}

impl From<&str> for ColumnEntry {
    fn from(s: &str) -> Self {
        ColumnEntry::Text(s.to_string())
    }
}

impl From<ColumnSpec> for ColumnEntry {
    fn from(spec: ColumnSpec) -> Self {
        ColumnEntry::Full(spec)
    }
}

/// A fully normalized column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: String,
    pub name: ColumnName,
    /// Declared width, kept so relative widths can be resolved again on resize.
    pub width: WidthSpec,
    pub resolved_width: Option<u16>,
    pub sort: Sort,
    pub fixed_header: bool,
}

impl Column {
    /// The concrete width, once a width adjustment has resolved one.
    pub fn width(&self) -> Option<u16> {
        self.resolved_width
    }

    pub fn as_string(&self) -> String {
        format!(
            "\"{}\" ({}), {:?}, render_width: {:?}, sort: {}, fixed_header: {}",
            self.name.to_line(),
            self.id,
            self.width,
            self.resolved_width,
            self.sort.enabled,
            self.fixed_header,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_spec_from_json() {
        let specs: Vec<ColumnSpec> = serde_json::from_str(
            r#"[
                {"name": "a"},
                {"name": "b", "sort": false},
                {"name": "c", "sort": null},
                {"name": "d", "sort": true},
                {"name": "e", "sort": {"direction": "desc", "numeric": true}}
            ]"#,
        )
        .unwrap();
        let sorts: Vec<SortSpec> = specs.into_iter().map(|s| s.sort).collect();
        assert_eq!(
            sorts,
            vec![
                SortSpec::Unset,
                SortSpec::Disabled,
                SortSpec::Disabled,
                SortSpec::Enabled,
                SortSpec::Settings(SortSettings {
                    enabled: None,
                    direction: Some(SortDirection::Descending),
                    numeric: Some(true),
                }),
            ]
        );
    }

    #[test]
    fn falsy_sort_values_disable() {
        let specs: Vec<ColumnSpec> = serde_json::from_str(
            r#"[
                {"name": "a", "sort": 0},
                {"name": "b", "sort": ""},
                {"name": "c", "sort": 1},
                {"name": "d", "sort": "yes"}
            ]"#,
        )
        .unwrap();
        let sorts: Vec<SortSpec> = specs.into_iter().map(|s| s.sort).collect();
        assert_eq!(
            sorts,
            vec![SortSpec::Disabled, SortSpec::Disabled, SortSpec::Enabled, SortSpec::Enabled]
        );
    }

    #[test]
    fn derived_setters() {
        let spec = ColumnSpec::new("Age")
            .with_id("age")
            .with_width(WidthSpec::Absolute(4))
            .with_sort(SortSpec::Enabled)
            .with_fixed_header(true);
        assert_eq!(spec.id.as_deref(), Some("age"));
        assert_eq!(spec.width, WidthSpec::Absolute(4));
        assert_eq!(spec.sort, SortSpec::Enabled);
        assert_eq!(spec.fixed_header, Some(true));
        assert_eq!(spec.clone().with_name("Years").name.as_text(), Some("Years"));
    }

    #[test]
    fn entries_from_json() {
        let entries: Vec<ColumnEntry> = serde_json::from_str(
            r#"["Name", {"name": "Age", "id": "age", "width": "20%", "fixedHeader": true}]"#,
        )
        .unwrap();
        assert_eq!(entries[0], ColumnEntry::Text("Name".into()));
        let ColumnEntry::Full(spec) = &entries[1] else {
            panic!("expected a full column spec");
        };
        assert_eq!(spec.id.as_deref(), Some("age"));
        assert_eq!(spec.width, WidthSpec::Relative(20.0));
        assert_eq!(spec.fixed_header, Some(true));
    }

    #[test]
    fn fragment_names_have_no_text() {
        let name = ColumnName::from(Line::from("styled"));
        assert_eq!(name.as_text(), None);
        assert_eq!(name.to_line().width(), 6);
    }
}
