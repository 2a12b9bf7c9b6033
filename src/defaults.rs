//! Normalization passes applied to every freshly built column list.
//!
//! The passes run in a fixed order: ids first, then sort, then fixed header.

use std::collections::HashSet;

use tracing::{trace, warn};

use crate::column::{Column, ColumnSpec, Sort, SortSpec};
use crate::config::GridConfig;
use crate::domain::GridError;

/// Runs all passes and turns raw specs into normalized columns.
pub fn normalize(specs: Vec<ColumnSpec>, config: &GridConfig) -> Result<Vec<Column>, GridError> {
    let mut specs = specs;
    let ids = infer_ids(&mut specs)?;
    let columns = specs
        .into_iter()
        .zip(ids)
        .map(|(spec, id)| Column {
            id,
            sort: normalize_sort(&spec.sort, config),
            fixed_header: propagate_fixed_header(spec.fixed_header, config),
            name: spec.name,
            width: spec.width,
            resolved_width: None,
        })
        .collect::<Vec<Column>>();

    for c in columns.iter() {
        trace!("Normalized column: {}", c.as_string());
    }
    Ok(columns)
}

/// Fills in missing ids from text names and returns the id of every column.
///
/// A column named by a styled fragment has no text to derive an id from and
/// must bring its own.
pub fn infer_ids(specs: &mut [ColumnSpec]) -> Result<Vec<String>, GridError> {
    let mut ids = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter_mut().enumerate() {
        if spec.id.as_deref().is_none_or(str::is_empty) {
            spec.id = spec.name.as_text().map(camel_case);
        }
        match spec.id.as_deref() {
            Some(id) if !id.is_empty() => ids.push(id.to_string()),
            _ => return Err(GridError::MissingColumnId { index }),
        }
    }
    for id in duplicate_ids(&ids) {
        warn!("Column id \"{id}\" is used by more than one column");
    }
    Ok(ids)
}

/// Ids that appear more than once, in order of their second appearance.
pub fn duplicate_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if !seen.insert(id.as_str()) && !duplicates.contains(&id.as_str()) {
            duplicates.push(id.as_str());
        }
    }
    duplicates
}

/// An explicit `false`/`null` always disables sorting, the global flag only
/// fills in columns that did not mention sorting at all.
pub fn normalize_sort(spec: &SortSpec, config: &GridConfig) -> Sort {
    match spec {
        SortSpec::Unset => Sort {
            enabled: config.sort,
            ..Default::default()
        },
        SortSpec::Disabled => Sort::default(),
        SortSpec::Enabled => Sort {
            enabled: true,
            ..Default::default()
        },
        SortSpec::Settings(settings) => Sort {
            enabled: settings.enabled.unwrap_or(true),
            settings: settings.clone(),
        },
    }
}

pub fn propagate_fixed_header(fixed_header: Option<bool>, config: &GridConfig) -> bool {
    fixed_header.unwrap_or(config.fixed_header)
}

/// Turns a label into an identifier: `"Phone Number"` becomes `"phoneNumber"`.
///
/// A single word that is already camel cased is kept as is.
pub fn camel_case(s: &str) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() == 1 && is_camel_cased(words[0]) {
        return words[0].to_string();
    }

    words
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            if idx == 0 {
                word.to_lowercase()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            }
        })
        .collect()
}

fn is_camel_cased(word: &str) -> bool {
    word.chars()
        .zip(word.chars().skip(1))
        .any(|(a, b)| a.is_lowercase() && b.is_uppercase())
}
