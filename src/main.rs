use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::{error, info};

use tvgrid::GridConfig;
use tvgrid::controller::Controller;
use tvgrid::domain::{AppConfig, GridError};
use tvgrid::logging::init_logging;
use tvgrid::model::{Model, Status};
use tvgrid::ui::TableUI;

/// Show a data file as a table with measured column widths.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data file to show (csv, parquet, arrow or a JSON array of records)
    path: String,

    /// JSON file with the table configuration
    #[arg(short, long)]
    config: Option<String>,

    /// HTML file whose table header defines the columns
    #[arg(long)]
    html: Option<String>,

    /// Resolve declared widths instead of measuring the first rows
    #[arg(long)]
    no_auto_width: bool,

    /// Enable sorting on all columns
    #[arg(long)]
    sort: bool,

    #[arg(long, default_value = "tvgrid.log")]
    log: String,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            error!("tvgrid failed: {e}");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand(path: &str) -> Result<PathBuf, GridError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| GridError::LoadingFailed(e.to_string()))
}

fn load_config(args: &Args) -> Result<GridConfig, GridError> {
    let mut cfg = match &args.config {
        Some(path) => GridConfig::from_json_file(&expand(path)?)?,
        None => GridConfig::default(),
    };
    if let Some(path) = &args.html {
        cfg.from = Some(fs::read_to_string(expand(path)?)?);
    }
    if args.no_auto_width {
        cfg.auto_width = false;
    }
    if args.sort {
        cfg.sort = true;
    }
    Ok(cfg)
}

fn run() -> Result<(), GridError> {
    let args = Args::parse();
    init_logging(&expand(&args.log)?)?;
    info!("Starting tvgrid with {:?}", args);

    let grid_cfg = load_config(&args)?;
    let cfg = AppConfig::default();

    let data_path = expand(&args.path)?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &grid_cfg, &cfg, data_path);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    grid_cfg: &GridConfig,
    cfg: &AppConfig,
    data_path: PathBuf,
) -> Result<(), GridError> {
    let size = terminal.size()?;

    let mut model = Model::init(grid_cfg, size.width, size.height);
    model.load_data_file(data_path)?;

    let mut ui = TableUI::new();
    let controller = Controller::new(cfg);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_config_fails_before_the_terminal_is_touched() {
        let args = Args::try_parse_from(["tvgrid", "data.csv", "--config", "/nonexistent/tvgrid.json"]).unwrap();
        assert!(matches!(load_config(&args), Err(GridError::IoError(_))));
    }

    #[test]
    fn flags_override_the_config() {
        let args = Args::try_parse_from(["tvgrid", "data.csv", "--no-auto-width", "--sort"]).unwrap();
        let cfg = load_config(&args).unwrap();
        assert!(!cfg.auto_width);
        assert!(cfg.sort);
        assert_eq!(args.log, "tvgrid.log");
    }
}
