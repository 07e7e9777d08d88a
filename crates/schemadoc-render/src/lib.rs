//! Schema-to-markdown rendering pipeline.
//!
//! Global settings are validated once into a [`GlobalConfig`]. Each tag found
//! in a document is merged over its defaults, the matching tables are selected
//! from the [`SchemaSnapshot`](schemadoc_core::SchemaSnapshot), projected and
//! rendered as markdown tables.

pub mod config;
pub mod ddl;
pub mod document;
pub mod errors;
pub mod merge;
pub mod project;
pub mod render;
pub mod select;
pub mod syntax;
pub mod tag;

pub use config::{
    DisplayConfig, Field, FilterConfig, GlobalConfig, RenderConfig, SortBy, TableStyleConfig,
    TextAlign,
};
pub use ddl::{DdlGenerator, Dialect, StandardDdl};
pub use document::{OnTagError, process_markdown};
pub use errors::{RenderError, Result};
pub use merge::{TagArguments, TagValue, merge};
pub use project::{ProjectedRow, project};
pub use render::{UNSCOPED_GROUP, render};
pub use select::select;
pub use syntax::{DEFAULT_TAG, TagMatch, parse_arguments, scan_tags};
pub use tag::{TagContext, resolve};
