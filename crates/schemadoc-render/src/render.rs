use schemadoc_core::{ConstraintDescriptor, ConstraintKind, TableDescriptor};

use crate::config::{RenderConfig, TextAlign};
use crate::ddl::DdlGenerator;
use crate::errors::Result;
use crate::project::{ProjectedRow, escape_cell, project};

/// Heading used for tables without a schema when grouping by schema.
pub const UNSCOPED_GROUP: &str = "unscoped";

/// Render the selected tables as markdown.
///
/// Sections are separated by one blank line and the output has no trailing
/// newline. An empty table list renders as an empty string. The only failure
/// is the DDL generator rejecting `config.sql_dialect` when `show_sql` is set.
pub fn render(
    tables: &[&TableDescriptor],
    config: &RenderConfig,
    ddl: &dyn DdlGenerator,
) -> Result<String> {
    let mut blocks = Vec::new();

    if config.group_by_schema {
        for (schema, members) in group_by_schema(tables) {
            let label = match schema {
                Some(schema) => format!("`{schema}`"),
                None => UNSCOPED_GROUP.to_string(),
            };
            blocks.push(heading(config.schema_heading_level, &label));
            for table in members {
                blocks.extend(render_table(table, config, ddl)?);
            }
        }
    } else {
        for &table in tables {
            blocks.extend(render_table(table, config, ddl)?);
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Partition tables by schema, groups in first-seen order.
fn group_by_schema<'a>(
    tables: &[&'a TableDescriptor],
) -> Vec<(Option<&'a str>, Vec<&'a TableDescriptor>)> {
    let mut groups: Vec<(Option<&'a str>, Vec<&'a TableDescriptor>)> = Vec::new();

    for &table in tables {
        let schema = table.schema.as_deref();
        match groups.iter_mut().find(|(key, _)| *key == schema) {
            Some((_, members)) => members.push(table),
            None => groups.push((schema, vec![table])),
        }
    }

    groups
}

fn render_table(
    table: &TableDescriptor,
    config: &RenderConfig,
    ddl: &dyn DdlGenerator,
) -> Result<Vec<String>> {
    let qualified = table.qualified_name();
    let mut blocks = vec![heading(config.heading_level, &format!("`{qualified}`"))];

    if let Some(comment) = table.comment.as_deref().map(str::trim) {
        if !comment.is_empty() {
            blocks.push(comment.to_string());
        }
    }

    let rows = project(table, config);
    blocks.push(markdown_table(&rows, config));

    if config.show_indexes {
        blocks.push(indexes_section(table));
    }
    if config.show_constraints {
        blocks.push(constraints_section(table));
    }
    if config.show_sql {
        let sql = ddl.create_table(table, &config.sql_dialect)?;
        blocks.push(format!("```sql\n{sql}\n```"));
    }

    tracing::debug!(
        event = "table_rendered",
        table = %qualified,
        rows = rows.len()
    );
    Ok(blocks)
}

fn heading(level: u8, text: &str) -> String {
    format!("{} {}", "#".repeat(usize::from(level)), text)
}

fn markdown_table(rows: &[ProjectedRow], config: &RenderConfig) -> String {
    let header: Vec<&str> = config.fields.iter().map(|field| field.name()).collect();
    let separator: Vec<String> = header
        .iter()
        .map(|name| separator_cell(name.len() + 2, config.text_align))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("|{}|", separator.join("|")));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(|(_, value)| value.as_str()).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

fn separator_cell(width: usize, align: TextAlign) -> String {
    match align {
        TextAlign::Left => format!(":{}", "-".repeat(width - 1)),
        TextAlign::Center => format!(":{}:", "-".repeat(width - 2)),
        TextAlign::Right => format!("{}:", "-".repeat(width - 1)),
    }
}

fn indexes_section(table: &TableDescriptor) -> String {
    if table.indexes.is_empty() {
        return "**Indexes:** None".to_string();
    }

    let mut lines = vec!["**Indexes:**".to_string(), String::new()];
    for index in &table.indexes {
        let mut line = format!("- `{}`: {}", index.name, code_list(&index.columns));
        if index.unique {
            line.push_str(" (unique)");
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn constraints_section(table: &TableDescriptor) -> String {
    // Unnamed and underscore-prefixed constraints are internal to the ORM.
    let documented: Vec<(&str, &ConstraintDescriptor)> = table
        .constraints
        .iter()
        .filter_map(|constraint| {
            let name = constraint.name.as_deref()?;
            (!name.starts_with('_')).then_some((name, constraint))
        })
        .collect();

    if documented.is_empty() {
        return "**Constraints:** None".to_string();
    }

    let mut lines = vec!["**Constraints:**".to_string(), String::new()];
    for (name, constraint) in documented {
        let detail = match (&constraint.kind, &constraint.expression) {
            (ConstraintKind::Check, Some(expression)) => format!("`{}`", escape_cell(expression)),
            _ => code_list(&constraint.columns),
        };
        if detail.is_empty() {
            lines.push(format!("- `{}` ({})", name, constraint.kind));
        } else {
            lines.push(format!("- `{}` ({}: {})", name, constraint.kind, detail));
        }
    }
    lines.join("\n")
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
