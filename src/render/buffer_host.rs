use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use tracing::trace;

use super::{RenderHost, ShadowTable};
use crate::config::DEFAULT_MAX_COLUMN_WIDTH;
use crate::domain::GridError;

/// Renders shadow tables into an off-screen ratatui buffer.
///
/// Each column gets a slot of `slot_width` cells. The measured width of a
/// column is the right edge of the widest content rendered into its slot.
#[derive(Debug)]
pub struct BufferHost {
    slot_width: u16,
    mounted: Option<Mounted>,
}

#[derive(Debug)]
struct Mounted {
    buffer: Buffer,
    columns: usize,
}

impl BufferHost {
    pub fn new(slot_width: u16) -> Self {
        Self {
            slot_width,
            mounted: None,
        }
    }

    pub fn slot_width(&self) -> u16 {
        self.slot_width
    }

    /// The scratch buffer, while a table is mounted.
    pub fn buffer(&self) -> Option<&Buffer> {
        self.mounted.as_ref().map(|m| &m.buffer)
    }
}

impl Default for BufferHost {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLUMN_WIDTH)
    }
}

impl RenderHost for BufferHost {
    fn mount(&mut self, table: &ShadowTable) -> Result<(), GridError> {
        if self.mounted.is_some() {
            return Err(GridError::RenderTargetBusy);
        }

        let columns = table.fitting_columns(self.slot_width);
        if columns < table.columns().len() {
            trace!(
                "Only {} of {} columns fit into the scratch buffer",
                columns,
                table.columns().len()
            );
        }
        let area = Rect::new(0, 0, columns as u16 * self.slot_width, table.height());
        let mut buffer = Buffer::empty(area);
        table.render_slots(area, &mut buffer, self.slot_width);

        self.mounted = Some(Mounted { buffer, columns });
        Ok(())
    }

    fn measure(&self, column: usize) -> Option<u16> {
        let mounted = self.mounted.as_ref()?;
        if column >= mounted.columns {
            return None;
        }

        let area = mounted.buffer.area;
        let x0 = column as u16 * self.slot_width;
        let mut extent = 0;
        for y in area.top()..area.bottom() {
            for x in x0..x0 + self.slot_width {
                let Some(cell) = mounted.buffer.cell((x, y)) else {
                    continue;
                };
                let symbol = cell.symbol();
                if symbol.trim().is_empty() {
                    continue;
                }
                let right = x - x0 + Span::raw(symbol).width() as u16;
                extent = extent.max(right.min(self.slot_width));
            }
        }

        // Nothing was rendered in this slot
        if extent == 0 { None } else { Some(extent) }
    }

    fn unmount(&mut self) {
        self.mounted = None;
    }

    fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnSpec;
    use crate::config::GridConfig;
    use crate::defaults::normalize;
    use crate::tabular::Tabular;
    use ratatui::text::Line;

    fn shadow(names: Vec<ColumnSpec>, rows: Vec<Vec<&str>>) -> ShadowTable {
        let columns = normalize(names, &GridConfig::default()).unwrap();
        let data = Tabular::from_rows(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        );
        ShadowTable::new(&columns, &data)
    }

    #[test]
    fn measures_widest_rendered_cell() {
        let table = shadow(
            vec![ColumnSpec::new("Name"), ColumnSpec::new("Age")],
            vec![vec!["Alexander", "7"], vec!["Bo", "10042"]],
        );
        let mut host = BufferHost::new(20);
        host.mount(&table).unwrap();
        assert_eq!(host.measure(0), Some(9));
        assert_eq!(host.measure(1), Some(5));
        assert_eq!(host.measure(2), None);
        host.unmount();
        assert!(!host.is_mounted());
        assert_eq!(host.measure(0), None);
    }

    #[test]
    fn header_counts_and_content_is_capped() {
        let table = shadow(
            vec![ColumnSpec::new("Identifier"), ColumnSpec::new("x")],
            vec![vec!["1", "a very long value that does not fit"]],
        );
        let mut host = BufferHost::new(8);
        host.mount(&table).unwrap();
        assert_eq!(host.measure(0), Some(8));
        assert_eq!(host.measure(1), Some(8));
    }

    #[test]
    fn wide_glyphs_count_double() {
        let table = shadow(
            vec![ColumnSpec::new(Line::from("名前")).with_id("name")],
            vec![vec!["a"]],
        );
        let mut host = BufferHost::new(10);
        host.mount(&table).unwrap();
        assert_eq!(host.measure(0), Some(4));
    }

    #[test]
    fn blank_column_is_unmeasurable() {
        let table = shadow(
            vec![ColumnSpec::new("a"), ColumnSpec::new("   ").with_id("blank")],
            vec![vec!["1", ""]],
        );
        let mut host = BufferHost::new(10);
        host.mount(&table).unwrap();
        assert_eq!(host.measure(0), Some(1));
        assert_eq!(host.measure(1), None);
    }

    #[test]
    fn second_mount_is_rejected() {
        let table = shadow(vec![ColumnSpec::new("a")], vec![]);
        let mut host = BufferHost::default();
        assert_eq!(host.slot_width(), DEFAULT_MAX_COLUMN_WIDTH);
        host.mount(&table).unwrap();
        assert!(matches!(host.mount(&table), Err(GridError::RenderTargetBusy)));
        host.unmount();
        assert!(host.mount(&table).is_ok());
    }
}
