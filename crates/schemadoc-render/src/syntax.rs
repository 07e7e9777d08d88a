use regex::Regex;

use crate::errors::{RenderError, Result};
use crate::merge::{TagArguments, TagValue};

/// Tag literal used when none is configured: `{% sqlalchemy ... %}`.
pub const DEFAULT_TAG: &str = "sqlalchemy";

/// One tag occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Byte offset of `{%`.
    pub start: usize,
    /// Byte offset just past `%}`.
    pub end: usize,
    /// Raw text between the tag literal and `%}`, possibly empty.
    pub arguments: String,
}

/// Find every `{% <tag> ... %}` marker in `markdown`, in document order.
pub fn scan_tags(markdown: &str, tag: &str) -> Result<Vec<TagMatch>> {
    let pattern = format!(r"\{{%\s*{}(?:\s+([^%]*?))?\s*%\}}", regex::escape(tag));
    let re = Regex::new(&pattern).map_err(|err| RenderError::TagSyntax(err.to_string()))?;

    let matches = re
        .captures_iter(markdown)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(TagMatch {
                start: whole.start(),
                end: whole.end(),
                arguments: caps
                    .get(1)
                    .map(|arguments| arguments.as_str().trim().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect();

    Ok(matches)
}

/// Parse `key="value"`, `key=true|false` and `key=123` pairs.
///
/// Values keep their literal type. Anything else, such as an unquoted word,
/// fails with [`RenderError::TagSyntax`].
pub fn parse_arguments(text: &str) -> Result<TagArguments> {
    let re = Regex::new(r#"^(\w+)\s*=\s*(?:"([^"]*)"|'([^']*)'|(true|false)|(-?\d+))"#)
        .map_err(|err| RenderError::TagSyntax(err.to_string()))?;

    let mut arguments = TagArguments::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let caps = re
            .captures(rest)
            .ok_or_else(|| RenderError::TagSyntax(format!("unexpected input near '{}'", near(rest))))?;
        let consumed = caps.get(0).map_or(0, |whole| whole.end());
        let after = &rest[consumed..];
        if after.chars().next().is_some_and(|next| !next.is_whitespace()) {
            return Err(RenderError::TagSyntax(format!(
                "unexpected input near '{}'",
                near(rest)
            )));
        }

        let key = caps.get(1).map_or("", |key| key.as_str());
        let value = if let Some(text) = caps.get(2).or_else(|| caps.get(3)) {
            TagValue::Str(text.as_str().to_string())
        } else if let Some(flag) = caps.get(4) {
            TagValue::Bool(flag.as_str() == "true")
        } else if let Some(number) = caps.get(5) {
            let number = number.as_str().parse::<i64>().map_err(|err| {
                RenderError::TagSyntax(format!("invalid integer for '{key}': {err}"))
            })?;
            TagValue::Int(number)
        } else {
            return Err(RenderError::TagSyntax(format!("missing value for '{key}'")));
        };

        arguments.insert(key, value);
        rest = after.trim_start();
    }

    Ok(arguments)
}

fn near(text: &str) -> String {
    text.chars().take(24).collect()
}
