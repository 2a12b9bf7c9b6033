//! Header extraction from an existing HTML table.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::column::ColumnSpec;
use crate::domain::GridError;
use crate::width::WidthSpec;

/// A parsed HTML document that may hold a table.
pub struct MarkupRoot {
    dom: RcDom,
}

/// Text and declared width of a single `th` element.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub text: String,
    pub width: Option<String>,
}

impl MarkupRoot {
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Self { dom }
    }

    /// The `th` cells of the first `thead` section, in document order.
    pub fn header_cells(&self) -> Result<Vec<HeaderCell>, GridError> {
        let thead = find_element(&self.dom.document, "thead").ok_or(GridError::MissingHeaderSection)?;

        let mut ths = Vec::new();
        collect_elements(&thead, "th", &mut ths);

        Ok(ths
            .iter()
            .map(|th| HeaderCell {
                text: normalize_whitespace(&text_content(th)),
                width: attribute(th, "width"),
            })
            .collect())
    }

    /// Header cells turned into raw column specs.
    pub fn column_specs(&self) -> Result<Vec<ColumnSpec>, GridError> {
        self.header_cells()?
            .into_iter()
            .map(|cell| {
                let width = match cell.width.as_deref() {
                    Some(w) => WidthSpec::parse(w)?,
                    None => WidthSpec::Unset,
                };
                Ok(ColumnSpec::new(cell.text).with_width(width))
            })
            .collect()
    }
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => (*name.local).eq_ignore_ascii_case(tag),
        _ => false,
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if is_element(handle, tag) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn collect_elements(handle: &Handle, tag: &str, out: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if is_element(child, tag) {
            out.push(child.clone());
        } else {
            collect_elements(child, tag, out);
        }
    }
}

fn attribute(handle: &Handle, attr: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (*a.name.local).eq_ignore_ascii_case(attr))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    append_text(handle, &mut out);
    out
}

fn append_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        append_text(child, out);
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <table>
          <thead>
            <tr><th width="20%">Name</th><th>Phone <b>Number</b></th><th width="12px">Age</th></tr>
          </thead>
          <tbody><tr><td>John</td><td>555</td><td>31</td></tr></tbody>
        </table>"#;

    #[test]
    fn header_cells_in_document_order() {
        let root = MarkupRoot::parse(TABLE);
        let cells = root.header_cells().unwrap();
        assert_eq!(
            cells,
            vec![
                HeaderCell { text: "Name".into(), width: Some("20%".into()) },
                HeaderCell { text: "Phone Number".into(), width: None },
                HeaderCell { text: "Age".into(), width: Some("12px".into()) },
            ]
        );
    }

    #[test]
    fn widths_are_parsed() {
        let specs = MarkupRoot::parse(TABLE).column_specs().unwrap();
        let widths: Vec<WidthSpec> = specs.iter().map(|s| s.width).collect();
        assert_eq!(
            widths,
            vec![WidthSpec::Relative(20.0), WidthSpec::Unset, WidthSpec::Absolute(12)]
        );
    }

    #[test]
    fn missing_thead() {
        let root = MarkupRoot::parse("<table><tr><td>x</td></tr></table>");
        assert!(matches!(root.header_cells(), Err(GridError::MissingHeaderSection)));
    }

    #[test]
    fn invalid_width_attribute() {
        let root = MarkupRoot::parse("<table><thead><tr><th width='wide'>A</th></tr></thead></table>");
        assert!(matches!(root.column_specs(), Err(GridError::InvalidWidth(_))));
    }
}
