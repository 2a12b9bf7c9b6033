//! Declared column widths and their resolution against a container.
//!
//! Widths are measured in terminal cells. A declared width is either absolute,
//! relative to the container (a percentage) or unset. Unset columns share
//! whatever space the other columns leave over.

use serde::{Deserialize, Deserializer};
use tracing::trace;

use crate::domain::GridError;

/// A column's declared (unresolved) width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WidthSpec {
    #[default]
    Unset,
    /// Width in cells, used as is.
    Absolute(u16),
    /// Percentage of the container width, `50.0` is half of it.
    Relative(f64),
}

impl WidthSpec {
    /// Parses `"50%"`, `"120px"` or `"120"`. An empty string is `Unset`.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(WidthSpec::Unset);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return match pct.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => Ok(WidthSpec::Relative(p)),
                _ => Err(GridError::InvalidWidth(s.to_string())),
            };
        }
        let cells = s.strip_suffix("px").unwrap_or(s).trim();
        cells
            .parse::<u16>()
            .map(WidthSpec::Absolute)
            .map_err(|_| GridError::InvalidWidth(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for WidthSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Cells(u16),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(WidthSpec::Unset),
            Some(Raw::Cells(n)) => Ok(WidthSpec::Absolute(n)),
            Some(Raw::Text(s)) => WidthSpec::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Resolves a single declared width against the container width.
///
/// Returns `None` when there is nothing to resolve: the container has no width
/// yet, or the width is unset (see [`resolve_all`] for the unset policy).
pub fn resolve(spec: &WidthSpec, container: u16) -> Option<u16> {
    if container == 0 {
        return None;
    }
    match *spec {
        WidthSpec::Unset => None,
        WidthSpec::Absolute(cells) => Some(cells),
        WidthSpec::Relative(pct) => {
            let cells = (f64::from(container) * pct / 100.0).round();
            Some(cells.clamp(0.0, f64::from(u16::MAX)) as u16)
        }
    }
}

/// Resolves all columns of a table at once.
///
/// Unset columns split the space left by the others equally. Cells that do not
/// divide evenly go one each to the leftmost unset columns. Returns `None` if
/// the container has no width yet.
pub fn resolve_all(specs: &[WidthSpec], container: u16) -> Option<Vec<u16>> {
    if container == 0 {
        return None;
    }

    let resolved: Vec<Option<u16>> = specs.iter().map(|s| resolve(s, container)).collect();
    let used: u32 = resolved.iter().flatten().map(|&w| u32::from(w)).sum();
    let unset = resolved.iter().filter(|w| w.is_none()).count() as u32;

    let remaining = u32::from(container).saturating_sub(used);
    let (share, mut leftover) = if unset > 0 {
        (remaining / unset, remaining % unset)
    } else {
        (0, 0)
    };
    trace!(
        "Resolve widths: container {}, used {}, unset {}, share {}, leftover {}",
        container, used, unset, share, leftover
    );

    let widths = resolved
        .into_iter()
        .map(|w| match w {
            Some(w) => w,
            None => {
                let extra = if leftover > 0 {
                    leftover -= 1;
                    1
                } else {
                    0
                };
                (share + extra) as u16
            }
        })
        .collect();
    Some(widths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_container() {
        assert_eq!(resolve(&WidthSpec::parse("50%").unwrap(), 400), Some(200));
        assert_eq!(resolve(&WidthSpec::Relative(33.0), 100), Some(33));
        assert_eq!(resolve(&WidthSpec::Relative(12.5), 100), Some(13));
    }

    #[test]
    fn zero_container_is_a_noop() {
        assert_eq!(resolve(&WidthSpec::Relative(50.0), 0), None);
        assert_eq!(resolve(&WidthSpec::Absolute(12), 0), None);
        assert_eq!(resolve_all(&[WidthSpec::Absolute(12)], 0), None);
    }

    #[test]
    fn absolute_is_unchanged() {
        assert_eq!(resolve(&WidthSpec::Absolute(17), 400), Some(17));
        assert_eq!(resolve(&WidthSpec::Absolute(900), 400), Some(900));
    }

    #[test]
    fn parse_variants() {
        assert_eq!(WidthSpec::parse("120px").unwrap(), WidthSpec::Absolute(120));
        assert_eq!(WidthSpec::parse(" 8 ").unwrap(), WidthSpec::Absolute(8));
        assert_eq!(WidthSpec::parse("").unwrap(), WidthSpec::Unset);
        assert_eq!(WidthSpec::parse("25%").unwrap(), WidthSpec::Relative(25.0));
        assert!(matches!(
            WidthSpec::parse("wide"),
            Err(GridError::InvalidWidth(_))
        ));
        assert!(WidthSpec::parse("-3%").is_err());
    }

    #[test]
    fn unset_columns_share_the_rest() {
        let specs = [
            WidthSpec::Absolute(10),
            WidthSpec::Unset,
            WidthSpec::Relative(50.0),
            WidthSpec::Unset,
            WidthSpec::Unset,
        ];
        // 100 - 10 - 50 = 40 -> 14, 13, 13
        assert_eq!(resolve_all(&specs, 100), Some(vec![10, 14, 50, 13, 13]));
        // Deterministic across calls
        assert_eq!(resolve_all(&specs, 100), resolve_all(&specs, 100));
    }

    #[test]
    fn unset_columns_get_nothing_when_space_is_used_up() {
        let specs = [WidthSpec::Absolute(80), WidthSpec::Absolute(40), WidthSpec::Unset];
        assert_eq!(resolve_all(&specs, 100), Some(vec![80, 40, 0]));
    }

    #[test]
    fn deserialize_from_json() {
        let specs: Vec<WidthSpec> =
            serde_json::from_str(r#"[12, "30%", "7px", null, ""]"#).unwrap();
        assert_eq!(
            specs,
            vec![
                WidthSpec::Absolute(12),
                WidthSpec::Relative(30.0),
                WidthSpec::Absolute(7),
                WidthSpec::Unset,
                WidthSpec::Unset,
            ]
        );
    }
}
