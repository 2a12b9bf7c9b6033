use std::io::Error;
use polars::error::PolarsError;
use thiserror::Error;

/// Every failure the grid can report.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("io error: {0}")]
    IoError(#[from] Error),
    #[error("polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("invalid configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("loading failed: {0}")]
    LoadingFailed(String),
    #[error("file not found")]
    FileNotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("unknown file type")]
    UnknownFileType,
    #[error("invalid width \"{0}\"")]
    InvalidWidth(String),
    #[error("markup has no table header section")]
    MissingHeaderSection,
    #[error("column {index} has no id and its name can not be turned into one")]
    MissingColumnId { index: usize },
    #[error("render target already holds a mounted table")]
    RenderTargetBusy,
}

/// Event loop settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub event_poll_time: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    ToggleAutoWidth,
    Resize(u16, u16),
}
