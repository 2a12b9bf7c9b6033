use polars::prelude::*;
use rayon::prelude::*;
use ratatui::layout::Rect;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::config::GridConfig;
use crate::domain::{GridError, Message};
use crate::header::Header;
use crate::render::BufferHost;
use crate::tabular::{EMPTY_CELL, Tabular, single_line};
use crate::ui::{BORDER_WIDTH, STATUSLINE_HEIGHT, column_area};

#[derive(Debug)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
    JSON,
}

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// A data file column with every value already turned into display text.
struct LoadedColumn {
    name: String,
    data: Vec<String>,
}

#[derive(Default, Clone, Debug)]
pub struct UILayout {
    pub width: u16,
    pub height: u16,
    pub table_area: Rect,
}

impl UILayout {
    pub fn from_values(ui_width: u16, ui_height: u16) -> Self {
        let table_width = ui_width.saturating_sub(2 * BORDER_WIDTH);
        let table_height = ui_height.saturating_sub(2 * BORDER_WIDTH + STATUSLINE_HEIGHT);
        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            table_area: Rect::new(BORDER_WIDTH, BORDER_WIDTH, table_width, table_height),
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

pub struct Model {
    config: GridConfig,
    pub status: Status,
    name: String,
    header: Option<Header>,
    data: Tabular,
    host: BufferHost,
    auto_width: bool,
    offset_row: usize,
    uilayout: UILayout,
    status_message: String,
}

impl Model {
    pub fn init(config: &GridConfig, ui_width: u16, ui_height: u16) -> Self {
        Self {
            config: config.clone(),
            status: Status::READY,
            name: String::from("tvgrid"),
            header: None,
            data: Tabular::default(),
            host: BufferHost::new(config.max_column_width),
            auto_width: config.auto_width,
            offset_row: 0,
            uilayout: UILayout::from_values(ui_width, ui_height),
            status_message: "Started tvgrid!".to_string(),
        }
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn data(&self) -> &Tabular {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset_row(&self) -> usize {
        self.offset_row
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Loads a data file, derives the header from it and resolves the widths.
    ///
    /// Columns given by the configuration (explicit or markup) take precedence
    /// over the column names of the file.
    pub fn load_data_file(&mut self, path: PathBuf) -> Result<bool, GridError> {
        let file_info = Model::get_file_info(path)?;
        let start_time = Instant::now();

        let records = match file_info.file_type {
            FileType::CSV => Model::load_frame(Model::load_csv(&file_info.path)?)?,
            FileType::PARQUET => Model::load_frame(Model::load_parquet(&file_info.path)?)?,
            FileType::ARROW => Model::load_frame(Model::load_arrow(&file_info.path)?)?,
            FileType::JSON => Model::load_json(&file_info.path)?,
        };

        let data_loading_duration = start_time.elapsed().as_millis();
        info!(
            "Loading {} records ({} bytes) took {data_loading_duration}ms ...",
            records.len(),
            file_info.file_size
        );

        self.name = file_info
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        self.load_records(records)?;
        self.set_status_message(format!("Loaded data in {}ms ...", data_loading_duration));
        Ok(true)
    }

    /// Builds header and rows from JSON records.
    pub fn load_records(&mut self, records: Vec<Value>) -> Result<(), GridError> {
        let mut config = self.config.clone();
        config.data = Some(records);

        self.header = Header::from_config(&config)?;
        let records = config.data.unwrap_or_default();
        self.data = match &self.header {
            Some(header) => Tabular::from_records(&records, header.columns()),
            None => Tabular::from_records(&records, &[]),
        };
        self.offset_row = 0;
        self.adjust_widths();
        Ok(())
    }

    fn adjust_widths(&mut self) {
        if let Some(header) = self.header.as_mut() {
            let container = Some(column_area(self.uilayout.table_area, header.len()));
            header.adjust_width(container, &mut self.host, &self.data, self.auto_width);
            for c in header.columns() {
                debug!("Column: {}", c.as_string());
            }
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn detect_file_type(path: &Path) -> Result<FileType, GridError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(FileType::CSV),
            Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
            Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
            Some("JSON") => Ok(FileType::JSON),
            _ => Err(GridError::UnknownFileType),
        }
    }

    fn get_file_info(path: PathBuf) -> Result<FileInfo, GridError> {
        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GridError::FileNotFound,
            ErrorKind::PermissionDenied => GridError::PermissionDenied,
            _ => GridError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(GridError::LoadingFailed("Not a file!".into()));
        }

        let file_size = metadata.len();
        let file_type = Model::detect_file_type(&path)?;

        Ok(FileInfo {
            path,
            file_size,
            file_type,
        })
    }

    // Each column is converted in its own thread, the records are assembled afterwards.
    fn load_frame(frame: LazyFrame) -> Result<Vec<Value>, GridError> {
        let df = Arc::new(frame.collect()?);
        let c_: Result<Vec<LoadedColumn>, _> = df
            .get_column_names()
            .par_iter()
            .map(|name| Self::load_column(&df, name))
            .collect();
        let columns = c_?;

        let nrows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let records = (0..nrows)
            .map(|ridx| {
                let record: Map<String, Value> = columns
                    .iter()
                    .map(|c| (c.name.clone(), Value::String(c.data[ridx].clone())))
                    .collect();
                Value::Object(record)
            })
            .collect();
        Ok(records)
    }

    fn load_column(df: &DataFrame, col_name: &str) -> Result<LoadedColumn, PolarsError> {
        let col = df.column(col_name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let data = series
            .into_iter()
            .map(|value| match value {
                Some(s) => single_line(s),
                None => String::from(EMPTY_CELL),
            })
            .collect();

        Ok(LoadedColumn {
            name: col_name.to_string(),
            data,
        })
    }

    fn load_json(path: &Path) -> Result<Vec<Value>, GridError> {
        let content = fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Array(records) => Ok(records),
            _ => Err(GridError::LoadingFailed(
                "Expected a JSON array of records!".into(),
            )),
        }
    }

    fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.into()))
            .with_has_header(true)
            .finish()
    }

    fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
    }

    fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_ipc(
            PlPath::Local(path.into()),
            polars::io::ipc::IpcScanOptions,
            UnifiedScanArgs::default(),
        )
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn ui_resize(&mut self, width: u16, height: u16) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(width, height);
        self.adjust_widths();
    }

    fn toggle_auto_width(&mut self) {
        self.auto_width = !self.auto_width;
        self.adjust_widths();
        let mode = if self.auto_width { "measured" } else { "declared" };
        self.set_status_message(format!("Using {mode} column widths"));
    }

    fn visible_rows(&self) -> usize {
        usize::from(
            self.uilayout
                .table_area
                .height
                .saturating_sub(crate::ui::TABLE_HEADER_HEIGHT),
        )
    }

    fn scroll_up(&mut self, size: usize) {
        self.offset_row = self.offset_row.saturating_sub(size);
    }

    fn scroll_down(&mut self, size: usize) {
        let last_offset = self.data.len().saturating_sub(self.visible_rows());
        self.offset_row = std::cmp::min(self.offset_row + size, last_offset);
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), GridError> {
        if let Some(msg) = message {
            match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.scroll_up(1),
                Message::MoveDown => self.scroll_down(1),
                Message::MovePageUp => self.scroll_up(self.visible_rows().max(1)),
                Message::MovePageDown => self.scroll_down(self.visible_rows().max(1)),
                Message::MoveBeginning => self.offset_row = 0,
                Message::MoveEnd => self.scroll_down(self.data.len()),
                Message::ToggleAutoWidth => self.toggle_auto_width(),
                Message::Resize(width, height) => self.ui_resize(width, height),
            }
        }
        Ok(())
    }
}
