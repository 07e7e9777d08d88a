use schemadoc_core::{ColumnDescriptor, TableDescriptor};

use crate::config::{Field, RenderConfig};

/// Display cells of one column, in `config.fields` order.
pub type ProjectedRow = Vec<(Field, String)>;

/// Project every column of `table`, in declaration order.
pub fn project(table: &TableDescriptor, config: &RenderConfig) -> Vec<ProjectedRow> {
    table
        .columns
        .iter()
        .map(|column| project_column(column, config))
        .collect()
}

pub fn project_column(column: &ColumnDescriptor, config: &RenderConfig) -> ProjectedRow {
    config
        .fields
        .iter()
        .map(|field| (*field, cell(*field, column, config)))
        .collect()
}

fn cell(field: Field, column: &ColumnDescriptor, config: &RenderConfig) -> String {
    let symbol = |flag: bool| {
        if flag {
            config.tick.clone()
        } else {
            config.cross.clone()
        }
    };

    match field {
        Field::Column => format!("`{}`", escape_cell(&column.name)),
        Field::Type => escape_cell(&column.data_type),
        Field::Nullable => symbol(column.nullable),
        // Absent defaults stay empty so they never read like a literal value.
        Field::Default => column.default.as_deref().map(escape_cell).unwrap_or_default(),
        Field::PrimaryKey => symbol(column.primary_key),
        Field::Unique => symbol(column.unique),
        Field::ForeignKey => symbol(column.is_foreign_key()),
        Field::References => column
            .foreign_key
            .as_ref()
            .map(|target| {
                let target = escape_cell(&target.to_string());
                format!("*{}*", target.replace('.', "&period;"))
            })
            .unwrap_or_default(),
        Field::Comment => column.comment.as_deref().map(escape_cell).unwrap_or_default(),
    }
}

/// Keep free text from breaking the markdown table row.
pub(crate) fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}
