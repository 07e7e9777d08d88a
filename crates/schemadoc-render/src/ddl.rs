//! `CREATE TABLE` generation for the optional SQL block.

use schemadoc_core::{ConstraintKind, TableDescriptor};

use crate::errors::{RenderError, Result};

/// SQL dialects understood by [`StandardDdl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Generic,
    PostgreSql,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Parse a dialect name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "generic" | "default" => Some(Self::Generic),
            "postgres" | "postgresql" => Some(Self::PostgreSql),
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    fn quote(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident.replace('`', "``")),
            _ => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    fn quote_list(self, idents: &[String]) -> String {
        idents
            .iter()
            .map(|ident| self.quote(ident))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn qualified(self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(name)),
            None => self.quote(name),
        }
    }
}

/// Produces DDL text for a table in a named dialect.
pub trait DdlGenerator: Send + Sync {
    /// Fails with [`RenderError::UnsupportedDialect`] for unknown dialects.
    fn create_table(&self, table: &TableDescriptor, dialect: &str) -> Result<String>;
}

/// Built-in generator covering columns, keys, unique and check constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDdl;

impl DdlGenerator for StandardDdl {
    fn create_table(&self, table: &TableDescriptor, dialect: &str) -> Result<String> {
        let dialect = Dialect::parse(dialect)
            .ok_or_else(|| RenderError::UnsupportedDialect(dialect.to_string()))?;
        Ok(create_table(table, dialect))
    }
}

fn create_table(table: &TableDescriptor, dialect: Dialect) -> String {
    let mut lines = Vec::new();

    let unique_sets: Vec<&Vec<String>> = table
        .constraints
        .iter()
        .filter(|constraint| constraint.kind == ConstraintKind::Unique)
        .map(|constraint| &constraint.columns)
        .collect();

    for column in &table.columns {
        let mut line = format!("{} {}", dialect.quote(&column.name), column.data_type);
        if !column.nullable {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            line.push_str(" DEFAULT ");
            line.push_str(default);
        }
        let covered = unique_sets
            .iter()
            .any(|columns| columns.len() == 1 && columns[0] == column.name);
        if column.unique && !column.primary_key && !covered {
            line.push_str(" UNIQUE");
        }
        lines.push(line);
    }

    let declared_pk = table
        .constraints
        .iter()
        .find(|constraint| constraint.kind == ConstraintKind::PrimaryKey);
    match declared_pk {
        Some(pk) if !pk.columns.is_empty() => {
            let clause = format!("PRIMARY KEY ({})", dialect.quote_list(&pk.columns));
            lines.push(named(dialect, pk.name.as_deref(), &clause));
        }
        _ => {
            let pk_columns: Vec<String> = table
                .columns
                .iter()
                .filter(|column| column.primary_key)
                .map(|column| column.name.clone())
                .collect();
            if !pk_columns.is_empty() {
                lines.push(format!("PRIMARY KEY ({})", dialect.quote_list(&pk_columns)));
            }
        }
    }

    for constraint in &table.constraints {
        match constraint.kind {
            ConstraintKind::Unique if !constraint.columns.is_empty() => {
                let clause = format!("UNIQUE ({})", dialect.quote_list(&constraint.columns));
                lines.push(named(dialect, constraint.name.as_deref(), &clause));
            }
            ConstraintKind::Check => {
                if let Some(expression) = &constraint.expression {
                    lines.push(named(
                        dialect,
                        constraint.name.as_deref(),
                        &format!("CHECK ({expression})"),
                    ));
                }
            }
            _ => {}
        }
    }

    for column in &table.columns {
        if let Some(target) = &column.foreign_key {
            lines.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                dialect.quote(&column.name),
                dialect.qualified(target.schema.as_deref(), &target.table),
                dialect.quote(&target.column)
            ));
        }
    }

    let body = lines
        .iter()
        .map(|line| format!("\t{line}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE {} (\n{}\n);",
        dialect.qualified(table.schema.as_deref(), &table.name),
        body
    )
}

fn named(dialect: Dialect, name: Option<&str>, clause: &str) -> String {
    match name {
        Some(name) => format!("CONSTRAINT {} {}", dialect.quote(name), clause),
        None => clause.to_string(),
    }
}
