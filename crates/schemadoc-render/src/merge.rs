use std::fmt;

use crate::config::{Field, MAX_HEADING_LEVEL, RenderConfig, SortBy, TextAlign};
use crate::errors::{RenderError, Result};

/// Typed value of a tag argument, as written by the document author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(value) => f.write_str(value),
            TagValue::Bool(value) => write!(f, "{value}"),
            TagValue::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Str(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Str(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Int(value)
    }
}

/// Ordered `key=value` pairs of one tag occurrence.
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagArguments {
    pairs: Vec<(String, TagValue)>,
}

impl TagArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TagValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        let position = self.pairs.iter().position(|(existing, _)| existing == key)?;
        Some(self.pairs.remove(position).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K: Into<String>, V: Into<TagValue>> FromIterator<(K, V)> for TagArguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = TagArguments::new();
        for (key, value) in iter {
            arguments.insert(key, value);
        }
        arguments
    }
}

/// Options a tag may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderOption {
    Fields,
    Tick,
    Cross,
    HeadingLevel,
    SchemaHeadingLevel,
    TextAlign,
    IncludeTables,
    ExcludeTables,
    ShowIndexes,
    ShowConstraints,
    ShowSql,
    SqlDialect,
    GroupBySchema,
    SortBy,
}

impl RenderOption {
    fn parse(key: &str) -> Option<Self> {
        let option = match key {
            "fields" => RenderOption::Fields,
            "tick" => RenderOption::Tick,
            "cross" => RenderOption::Cross,
            "heading_level" => RenderOption::HeadingLevel,
            "schema_heading_level" => RenderOption::SchemaHeadingLevel,
            "text_align" => RenderOption::TextAlign,
            "include_tables" | "include" => RenderOption::IncludeTables,
            "exclude_tables" | "exclude" => RenderOption::ExcludeTables,
            "show_indexes" => RenderOption::ShowIndexes,
            "show_constraints" => RenderOption::ShowConstraints,
            "show_sql" => RenderOption::ShowSql,
            "sql_dialect" => RenderOption::SqlDialect,
            "group_by_schema" => RenderOption::GroupBySchema,
            "sort_by" => RenderOption::SortBy,
            _ => return None,
        };
        Some(option)
    }

    fn apply(self, config: &mut RenderConfig, key: &str, value: &TagValue) -> Result<()> {
        match self {
            RenderOption::Fields => config.fields = coerce_fields(key, value)?,
            RenderOption::Tick => config.tick = value.to_string(),
            RenderOption::Cross => config.cross = value.to_string(),
            RenderOption::HeadingLevel => config.heading_level = coerce_heading(key, value)?,
            RenderOption::SchemaHeadingLevel => {
                config.schema_heading_level = coerce_heading(key, value)?
            }
            RenderOption::TextAlign => {
                config.text_align = TextAlign::parse(&value.to_string())
                    .ok_or_else(|| RenderError::coercion(key, "left, center or right", value))?
            }
            RenderOption::IncludeTables => config.include_tables = split_list(value),
            RenderOption::ExcludeTables => config.exclude_tables = split_list(value),
            RenderOption::ShowIndexes => config.show_indexes = coerce_bool(key, value)?,
            RenderOption::ShowConstraints => config.show_constraints = coerce_bool(key, value)?,
            RenderOption::ShowSql => config.show_sql = coerce_bool(key, value)?,
            RenderOption::SqlDialect => config.sql_dialect = value.to_string().trim().to_string(),
            RenderOption::GroupBySchema => config.group_by_schema = coerce_bool(key, value)?,
            RenderOption::SortBy => {
                config.sort_by = SortBy::parse(&value.to_string())
                    .ok_or_else(|| RenderError::coercion(key, "none or name", value))?
            }
        }
        Ok(())
    }
}

/// Overlay tag overrides on the global defaults.
///
/// Either every override validates and a new config is returned, or the first
/// failure is returned and `global` is untouched.
pub fn merge(global: &RenderConfig, overrides: &TagArguments) -> Result<RenderConfig> {
    let mut merged = global.clone();

    for (key, value) in overrides.iter() {
        let option = RenderOption::parse(key).ok_or_else(|| RenderError::UnknownOption {
            key: key.to_string(),
        })?;
        option.apply(&mut merged, key, value)?;
    }

    Ok(merged)
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(value: &TagValue) -> Vec<String> {
    value
        .to_string()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn coerce_bool(key: &str, value: &TagValue) -> Result<bool> {
    match value {
        TagValue::Bool(flag) => Ok(*flag),
        TagValue::Str(text) if text == "true" => Ok(true),
        TagValue::Str(text) if text == "false" => Ok(false),
        other => Err(RenderError::coercion(key, "true or false", other)),
    }
}

fn coerce_heading(key: &str, value: &TagValue) -> Result<u8> {
    let expected = format!("an integer between 1 and {MAX_HEADING_LEVEL}");
    let level = match value {
        TagValue::Int(level) => *level,
        TagValue::Str(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| RenderError::coercion(key, expected.as_str(), value))?,
        TagValue::Bool(_) => return Err(RenderError::coercion(key, expected, value)),
    };

    u8::try_from(level)
        .ok()
        .filter(|level| (1..=MAX_HEADING_LEVEL).contains(level))
        .ok_or_else(|| RenderError::coercion(key, expected, value))
}

fn coerce_fields(key: &str, value: &TagValue) -> Result<Vec<Field>> {
    let items = split_list(value);
    if items.is_empty() {
        return Err(RenderError::coercion(key, "at least one field", value));
    }

    items
        .iter()
        .map(|item| {
            Field::parse(item).ok_or_else(|| RenderError::coercion(key, Field::expected(), item))
        })
        .collect()
}
