use schemadoc_core::{SchemaSnapshot, TableDescriptor};

use crate::config::{RenderConfig, SortBy};
use crate::errors::{RenderError, Result};

/// Pick the tables a render call documents.
///
/// With a single-table selector every other filter is bypassed. Otherwise
/// `include_tables` narrows the snapshot and `exclude_tables` always wins.
/// Tables stay in snapshot order unless `sort_by` is `name`. An empty result
/// is not an error.
pub fn select<'a>(
    snapshot: &'a SchemaSnapshot,
    config: &RenderConfig,
) -> Result<Vec<&'a TableDescriptor>> {
    if let Some(selector) = &config.table {
        let table = snapshot
            .iter()
            .find(|table| table.name == *selector)
            .or_else(|| {
                snapshot
                    .iter()
                    .find(|table| table.schema.is_some() && table.qualified_name() == *selector)
            })
            .ok_or_else(|| RenderError::TableNotFound(selector.clone()))?;
        return Ok(vec![table]);
    }

    let mut selected: Vec<&TableDescriptor> = snapshot
        .iter()
        .filter(|table| {
            config.include_tables.is_empty() || listed(table, &config.include_tables)
        })
        .filter(|table| !listed(table, &config.exclude_tables))
        .collect();

    if config.sort_by == SortBy::Name {
        selected.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.schema.cmp(&b.schema)));
    }

    tracing::debug!(
        event = "tables_selected",
        selected = selected.len(),
        total = snapshot.len()
    );
    Ok(selected)
}

/// Lists match a table by bare name or by `schema.name`.
fn listed(table: &TableDescriptor, names: &[String]) -> bool {
    names
        .iter()
        .any(|name| *name == table.name || (table.schema.is_some() && *name == table.qualified_name()))
}
