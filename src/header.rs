use ratatui::layout::Rect;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::column::{Column, ColumnSpec};
use crate::config::GridConfig;
use crate::defaults::normalize;
use crate::domain::GridError;
use crate::markup::MarkupRoot;
use crate::render::{MountGuard, RenderHost, SHADOW_SAMPLE_ROWS, ShadowTable};
use crate::tabular::Tabular;
use crate::width::{WidthSpec, resolve_all};

/// The column structure of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    columns: Vec<Column>,
}

impl Header {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Builds the header from the first source the configuration provides:
    /// markup, then an explicit column list, then the keys of the first data
    /// record.
    ///
    /// Returns `Ok(None)` if no source yields any column.
    pub fn from_config(config: &GridConfig) -> Result<Option<Header>, GridError> {
        let specs = if let Some(html) = &config.from {
            trace!("Building header from markup");
            MarkupRoot::parse(html).column_specs()?
        } else if let Some(entries) = &config.columns {
            trace!("Building header from {} column entries", entries.len());
            entries.iter().cloned().map(ColumnSpec::from).collect()
        } else if let Some(Value::Object(record)) = config.data.as_ref().and_then(|d| d.first()) {
            trace!("Building header from record keys");
            record.keys().map(|key| ColumnSpec::new(key.as_str())).collect()
        } else {
            Vec::new()
        };

        if specs.is_empty() {
            debug!("No columns could be derived from the configuration");
            return Ok(None);
        }

        let columns = normalize(specs, config)?;
        Ok(Some(Header { columns }))
    }

    /// Builds the header from the `thead` section of an HTML table, with
    /// default settings for sort and fixed header.
    pub fn from_markup(root: &MarkupRoot) -> Result<Header, GridError> {
        let columns = normalize(root.column_specs()?, &GridConfig::default())?;
        Ok(Header { columns })
    }

    /// Resolves a concrete width for every column.
    ///
    /// With `auto_width` and a non-empty sample, up to ten rows are rendered
    /// through `host` and each column takes its measured width. Otherwise the
    /// declared widths are resolved against the container width.
    ///
    /// Does nothing until the container has a width. Columns that can not be
    /// measured keep their previous width.
    #[instrument(skip_all, fields(columns = self.columns.len(), rows = data.len(), auto_width = auto_width))]
    pub fn adjust_width<H: RenderHost + ?Sized>(
        &mut self,
        container: Option<Rect>,
        host: &mut H,
        data: &Tabular,
        auto_width: bool,
    ) -> &mut Self {
        let container_width = match container {
            Some(area) if area.width > 0 => area.width,
            _ => {
                trace!("Container has no width yet, skipping width adjustment");
                return self;
            }
        };

        if auto_width && !data.is_empty() {
            self.measure_widths(host, data);
        } else {
            self.resolve_widths(container_width);
        }
        self
    }

    fn resolve_widths(&mut self, container_width: u16) {
        let specs: Vec<WidthSpec> = self.columns.iter().map(|c| c.width).collect();
        if let Some(widths) = resolve_all(&specs, container_width) {
            for (column, width) in self.columns.iter_mut().zip(widths) {
                column.resolved_width = Some(width);
            }
        }
    }

    fn measure_widths<H: RenderHost + ?Sized>(&mut self, host: &mut H, data: &Tabular) {
        let shadow = ShadowTable::new(&self.columns, &data.head(SHADOW_SAMPLE_ROWS));

        let measured: Vec<Option<u16>> = match MountGuard::mount(host, &shadow) {
            Ok(guard) => (0..self.columns.len()).map(|idx| guard.measure(idx)).collect(),
            Err(e) => {
                warn!("Could not mount shadow table: {e}");
                return;
            }
        };

        for (column, width) in self.columns.iter_mut().zip(measured) {
            match width {
                Some(w) => column.resolved_width = Some(w),
                None => debug!("Could not measure column {}, keeping {:?}", column.id, column.resolved_width),
            }
        }
    }
}
