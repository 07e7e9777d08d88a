use crate::errors::Result;
use crate::syntax::{parse_arguments, scan_tags};
use crate::tag::TagContext;

/// What to do when a tag in a page fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnTagError {
    /// Fail the page, and with it the build.
    #[default]
    Abort,
    /// Replace the tag with a visible error note and keep going.
    Inline,
}

/// Replace every tag in `markdown` with its rendered documentation.
///
/// Pages without tags are returned unchanged.
pub fn process_markdown(
    markdown: &str,
    ctx: &TagContext<'_>,
    on_error: OnTagError,
) -> Result<String> {
    let tags = scan_tags(markdown, ctx.tag)?;
    if tags.is_empty() {
        return Ok(markdown.to_string());
    }

    tracing::info!(event = "tags_found", count = tags.len());

    let mut output = String::with_capacity(markdown.len());
    let mut cursor = 0;

    for tag in &tags {
        output.push_str(&markdown[cursor..tag.start]);

        let rendered = parse_arguments(&tag.arguments).and_then(|arguments| ctx.resolve(&arguments));
        match (rendered, on_error) {
            (Ok(text), _) => output.push_str(&text),
            (Err(err), OnTagError::Abort) => return Err(err),
            (Err(err), OnTagError::Inline) => {
                let source = &markdown[tag.start..tag.end];
                tracing::error!(event = "tag_failed", tag = %source, error = %err);
                // A blockquote must start and end on its own line.
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push_str("\n\n");
                }
                output.push_str(&format!("> **schemadoc error:** {err}"));
                if markdown[tag.end..]
                    .chars()
                    .next()
                    .is_some_and(|next| next != '\n' && next != '\r')
                {
                    output.push_str("\n\n");
                }
            }
        }

        cursor = tag.end;
    }

    output.push_str(&markdown[cursor..]);
    Ok(output)
}
