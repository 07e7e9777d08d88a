use schemadoc_core::SchemaSnapshot;

use crate::config::RenderConfig;
use crate::ddl::DdlGenerator;
use crate::errors::Result;
use crate::merge::{TagArguments, merge};
use crate::render::render;
use crate::select::select;

/// Argument naming a single table; handled outside the option merge.
pub const TABLE_ARGUMENT: &str = "table";

/// Resolve one tag occurrence to markdown.
///
/// `table` is split out as the single-table selector, the remaining arguments
/// are merged over `global`, then the selected tables are rendered. Errors from
/// every stage are returned unchanged.
pub fn resolve(
    arguments: &TagArguments,
    global: &RenderConfig,
    snapshot: &SchemaSnapshot,
    ddl: &dyn DdlGenerator,
) -> Result<String> {
    let mut overrides = arguments.clone();
    let selector = overrides.remove(TABLE_ARGUMENT);

    let mut config = merge(global, &overrides)?;
    if let Some(selector) = selector {
        config.table = Some(selector.to_string());
    }

    let tables = select(snapshot, &config)?;
    render(&tables, &config, ddl)
}

/// Everything a build needs to resolve tags: loaded once, shared read-only.
pub struct TagContext<'a> {
    /// Tag literal recognized in documents.
    pub tag: &'a str,
    pub defaults: RenderConfig,
    pub snapshot: &'a SchemaSnapshot,
    pub ddl: &'a dyn DdlGenerator,
}

impl<'a> TagContext<'a> {
    pub fn new(
        tag: &'a str,
        defaults: RenderConfig,
        snapshot: &'a SchemaSnapshot,
        ddl: &'a dyn DdlGenerator,
    ) -> Self {
        Self {
            tag,
            defaults,
            snapshot,
            ddl,
        }
    }

    pub fn resolve(&self, arguments: &TagArguments) -> Result<String> {
        resolve(arguments, &self.defaults, self.snapshot, self.ddl)
    }
}
