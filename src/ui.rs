use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Cell, Paragraph, Row, Table, Widget},
};

use crate::header::Header;
use crate::model::Model;
use crate::tabular::Tabular;

pub const STATUSLINE_HEIGHT: u16 = 1;
pub const TABLE_HEADER_HEIGHT: u16 = 1;
pub const BORDER_WIDTH: u16 = 1;
pub const COLUMN_SPACING: u16 = 1;

/// The part of `area` left for cell content once the spacing between
/// `columns` columns is taken out. Widths resolved against it are drawn as is.
pub fn column_area(area: Rect, columns: usize) -> Rect {
    let gaps = u16::try_from(columns.saturating_sub(1)).unwrap_or(u16::MAX);
    Rect {
        width: area.width.saturating_sub(gaps.saturating_mul(COLUMN_SPACING)),
        ..area
    }
}

/// Renders a header and its rows with the resolved column widths.
///
/// Columns without a resolved width share the remaining space. When the rows
/// are scrolled, only columns with a fixed header keep their header label.
pub struct GridTable<'a> {
    header: &'a Header,
    data: &'a Tabular,
    offset_row: usize,
}

impl<'a> GridTable<'a> {
    pub fn new(header: &'a Header, data: &'a Tabular) -> Self {
        Self {
            header,
            data,
            offset_row: 0,
        }
    }

    pub fn offset_row(mut self, offset_row: usize) -> Self {
        self.offset_row = offset_row;
        self
    }

    fn widths(&self) -> Vec<Constraint> {
        self.header
            .columns()
            .iter()
            .map(|c| match c.width() {
                Some(w) => Constraint::Length(w),
                None => Constraint::Fill(1),
            })
            .collect()
    }

    fn header_row(&self) -> Row<'static> {
        let scrolled = self.offset_row > 0;
        let cells = self.header.columns().iter().map(|c| {
            if scrolled && !c.fixed_header {
                Cell::from("")
            } else {
                Cell::from(c.name.to_line())
            }
        });
        Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
    }
}

impl Widget for GridTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self
            .data
            .rows()
            .iter()
            .skip(self.offset_row)
            .take(usize::from(area.height.saturating_sub(TABLE_HEADER_HEIGHT)))
            .map(|row| Row::new(row.iter().map(|c| Cell::from(c.as_str()))));

        Table::new(rows, self.widths())
            .header(self.header_row())
            .column_spacing(COLUMN_SPACING)
            .render(area, buf);
    }
}

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUSLINE_HEIGHT)])
                .areas(frame.area());

        let title = Line::from(format!(" {} ", model.name())).bold();
        let instructions = Line::from(vec![
            " Scroll ".into(),
            "<Up/Down>".blue().bold(),
            " Auto width ".into(),
            "<A>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);
        let inner = block.inner(main);
        frame.render_widget(block, main);

        match model.header() {
            Some(header) => frame.render_widget(
                GridTable::new(header, model.data()).offset_row(model.offset_row()),
                inner,
            ),
            None => frame.render_widget(
                Paragraph::new("No columns could be derived from the input.").centered(),
                inner,
            ),
        }

        frame.render_widget(Paragraph::new(model.status_message().to_string()), status);
    }
}
