//! Column model and width resolution for terminal table widgets.
//!
//! A [`Header`] is built once from a [`GridConfig`] (markup, explicit columns
//! or the keys of the first record) and then resized with
//! [`Header::adjust_width`], either from the declared widths or by measuring a
//! shadow render of the first rows.

pub mod column;
pub mod config;
pub mod controller;
pub mod defaults;
pub mod domain;
pub mod header;
pub mod logging;
pub mod markup;
pub mod model;
pub mod render;
pub mod tabular;
pub mod ui;
pub mod width;

pub use column::{Column, ColumnEntry, ColumnName, ColumnSpec, Sort, SortSpec};
pub use config::GridConfig;
pub use domain::GridError;
pub use header::Header;
pub use markup::MarkupRoot;
pub use render::{BufferHost, RenderHost, ShadowTable};
pub use tabular::Tabular;
pub use width::WidthSpec;
