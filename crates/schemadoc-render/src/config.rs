use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, Result};

pub const DEFAULT_TICK: &str = "✔️";
pub const DEFAULT_CROSS: &str = "❌";
pub const DEFAULT_SQL_DIALECT: &str = "postgresql";
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Column attribute that can be shown as a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Column,
    Type,
    Nullable,
    Default,
    PrimaryKey,
    Unique,
    ForeignKey,
    /// Target of the column's foreign key.
    References,
    Comment,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Column,
        Field::Type,
        Field::Nullable,
        Field::Default,
        Field::PrimaryKey,
        Field::Unique,
        Field::ForeignKey,
        Field::References,
        Field::Comment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Column => "column",
            Field::Type => "type",
            Field::Nullable => "nullable",
            Field::Default => "default",
            Field::PrimaryKey => "primary_key",
            Field::Unique => "unique",
            Field::ForeignKey => "foreign_key",
            Field::References => "references",
            Field::Comment => "comment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.name() == value)
    }

    /// Fields rendered with the tick/cross symbols.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            Field::Nullable | Field::PrimaryKey | Field::Unique | Field::ForeignKey
        )
    }

    pub(crate) fn expected() -> String {
        let names: Vec<&str> = Field::ALL.iter().map(|field| field.name()).collect();
        format!("one of {}", names.join(", "))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn default_fields() -> Vec<Field> {
    vec![
        Field::Column,
        Field::Type,
        Field::Nullable,
        Field::Default,
        Field::PrimaryKey,
        Field::Unique,
        Field::ForeignKey,
    ]
}

/// Cell alignment encoded in the markdown separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

/// Order of the tables a multi-table render documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Snapshot (registry) order.
    #[default]
    #[serde(rename = "none")]
    Snapshot,
    /// Bare table name, schema breaking ties.
    Name,
}

impl SortBy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(SortBy::Snapshot),
            "name" => Some(SortBy::Name),
            _ => None,
        }
    }
}

/// `[table_style]` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableStyleConfig {
    pub tick: String,
    pub cross: String,
    pub fields: Vec<Field>,
    pub heading_level: u8,
    pub schema_heading_level: u8,
    pub text_align: TextAlign,
}

impl Default for TableStyleConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK.to_string(),
            cross: DEFAULT_CROSS.to_string(),
            fields: default_fields(),
            heading_level: 2,
            schema_heading_level: 1,
            text_align: TextAlign::Left,
        }
    }
}

/// `[filter]` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub include_tables: Vec<String>,
    pub exclude_tables: Vec<String>,
}

/// `[display]` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub show_indexes: bool,
    pub show_constraints: bool,
    pub show_sql: bool,
    pub sql_dialect: String,
    pub group_by_schema: bool,
    pub sort_by: SortBy,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_indexes: true,
            show_constraints: true,
            show_sql: false,
            sql_dialect: DEFAULT_SQL_DIALECT.to_string(),
            group_by_schema: false,
            sort_by: SortBy::Snapshot,
        }
    }
}

/// Global settings, validated once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Reference handed to the schema provider.
    pub base_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_path: Option<PathBuf>,
    /// Extra directories the schema provider searches.
    #[serde(default, rename = "python_path", skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,
    #[serde(default)]
    pub table_style: TableStyleConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl GlobalConfig {
    /// Minimal configuration pointing at `base_class` with default styling.
    pub fn new(base_class: impl Into<String>) -> Self {
        Self {
            base_class: base_class.into(),
            app_path: None,
            search_paths: Vec::new(),
            table_style: TableStyleConfig::default(),
            filter: FilterConfig::default(),
            display: DisplayConfig::default(),
        }
    }

    /// Parse and validate a TOML settings document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: GlobalConfig = toml::from_str(contents)
            .map_err(|err| RenderError::ConfigValidation(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a raw settings table handed over by a host tool.
    pub fn from_table(table: toml::Table) -> Result<Self> {
        let config: GlobalConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|err: toml::de::Error| RenderError::ConfigValidation(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.base_class.trim().is_empty() {
            return Err(RenderError::ConfigValidation(
                "base_class must not be empty".to_string(),
            ));
        }

        let style = &self.table_style;
        for (key, level) in [
            ("table_style.heading_level", style.heading_level),
            ("table_style.schema_heading_level", style.schema_heading_level),
        ] {
            if !(1..=MAX_HEADING_LEVEL).contains(&level) {
                return Err(RenderError::ConfigValidation(format!(
                    "{key} must be between 1 and {MAX_HEADING_LEVEL}, got {level}"
                )));
            }
        }

        if style.fields.is_empty() {
            return Err(RenderError::ConfigValidation(
                "table_style.fields must list at least one field".to_string(),
            ));
        }

        if self.display.sql_dialect.trim().is_empty() {
            return Err(RenderError::ConfigValidation(
                "display.sql_dialect must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Defaults every tag starts from before its overrides are applied.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            fields: self.table_style.fields.clone(),
            tick: self.table_style.tick.clone(),
            cross: self.table_style.cross.clone(),
            heading_level: self.table_style.heading_level,
            schema_heading_level: self.table_style.schema_heading_level,
            text_align: self.table_style.text_align,
            include_tables: self.filter.include_tables.clone(),
            exclude_tables: self.filter.exclude_tables.clone(),
            table: None,
            show_indexes: self.display.show_indexes,
            show_constraints: self.display.show_constraints,
            show_sql: self.display.show_sql,
            sql_dialect: self.display.sql_dialect.clone(),
            group_by_schema: self.display.group_by_schema,
            sort_by: self.display.sort_by,
        }
    }
}

/// Fully merged configuration for exactly one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub fields: Vec<Field>,
    pub tick: String,
    pub cross: String,
    pub heading_level: u8,
    pub schema_heading_level: u8,
    pub text_align: TextAlign,
    pub include_tables: Vec<String>,
    /// Takes precedence over `include_tables`.
    pub exclude_tables: Vec<String>,
    /// Single-table selector; bypasses include/exclude when set.
    pub table: Option<String>,
    pub show_indexes: bool,
    pub show_constraints: bool,
    pub show_sql: bool,
    pub sql_dialect: String,
    pub group_by_schema: bool,
    pub sort_by: SortBy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        GlobalConfig::new("schema.json").render_config()
    }
}
