use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::style::Style;

use crate::column::Column;
use crate::tabular::{Row, Tabular};

/// An immutable snapshot of the header and a few sample rows.
///
/// Every column is rendered into its own slot of `slot_width` cells, without
/// spacing or borders, so the rendered extent of a slot is the column's
/// natural width (capped at the slot).
#[derive(Debug, Clone)]
pub struct ShadowTable {
    columns: Vec<Line<'static>>,
    rows: Vec<Row>,
}

impl ShadowTable {
    pub fn new(columns: &[Column], data: &Tabular) -> Self {
        Self {
            columns: columns.iter().map(|c| c.name.to_line()).collect(),
            rows: data.rows().to_vec(),
        }
    }

    pub fn columns(&self) -> &[Line<'static>] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Height of the render: one header line plus the rows.
    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len() + 1).unwrap_or(u16::MAX)
    }

    /// Number of column slots of `slot_width` that fit into a buffer.
    pub fn fitting_columns(&self, slot_width: u16) -> usize {
        if slot_width == 0 {
            return 0;
        }
        self.columns.len().min(usize::from(u16::MAX / slot_width))
    }

    /// Renders the slots into `area`, one slot of `slot_width` per column.
    pub fn render_slots(&self, area: Rect, buf: &mut Buffer, slot_width: u16) {
        for cidx in 0..self.fitting_columns(slot_width) {
            let x = area.x + cidx as u16 * slot_width;
            if x >= area.right() {
                break;
            }
            let max_width = slot_width.min(area.right() - x);

            buf.set_line(x, area.y, &self.columns[cidx], max_width);
            for (ridx, row) in self.rows.iter().enumerate() {
                let y = match u16::try_from(ridx + 1) {
                    Ok(offset) if offset < area.height => area.y + offset,
                    _ => break,
                };
                if let Some(cell) = row.get(cidx) {
                    buf.set_stringn(x, y, cell, usize::from(max_width), Style::default());
                }
            }
        }
    }
}
