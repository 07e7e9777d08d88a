use std::fs;
use std::path::{Path, PathBuf};

use schemadoc_render::{OnTagError, TagContext, process_markdown};
use walkdir::WalkDir;

use super::atomic::write_bytes_atomic;
use crate::CliError;

/// Counts reported at the end of a build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub rewritten: usize,
}

/// Markdown pages under `root`, sorted for a stable processing order.
///
/// Symlinked directories are not descended into, so a link cycle cannot
/// multiply pages.
fn collect_pages(root: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            pages.push(path.to_path_buf());
        }
    }

    pages.sort();
    Ok(pages)
}

/// Process every page under `input` and mirror it into `output`.
pub fn build_site(
    input: &Path,
    output: &Path,
    ctx: &TagContext<'_>,
    on_error: OnTagError,
) -> Result<BuildSummary, CliError> {
    let mut summary = BuildSummary::default();

    for page in collect_pages(input)? {
        let relative = page.strip_prefix(input).map_err(|_| {
            CliError::InvalidConfig(format!("{} is outside {}", page.display(), input.display()))
        })?;
        let source = fs::read_to_string(&page)?;
        let rendered = process_markdown(&source, ctx, on_error).map_err(|err| CliError::Page {
            path: page.clone(),
            source: err,
        })?;

        if rendered != source {
            summary.rewritten += 1;
        }
        summary.pages += 1;

        let target = output.join(relative);
        write_bytes_atomic(&target, rendered.as_bytes())?;
        tracing::debug!(event = "page_written", path = %target.display());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use schemadoc_core::{ColumnDescriptor, SchemaSnapshot, TableDescriptor};
    use schemadoc_render::{Field, GlobalConfig, RenderConfig, StandardDdl};

    use super::*;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot::new(vec![TableDescriptor {
            name: "users".to_string(),
            schema: None,
            comment: None,
            columns: vec![ColumnDescriptor {
                name: "id".to_string(),
                data_type: "INTEGER".to_string(),
                nullable: false,
                default: None,
                primary_key: true,
                unique: false,
                foreign_key: None,
                comment: None,
            }],
            indexes: Vec::new(),
            constraints: Vec::new(),
        }])
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "schemadoc-cli-{}-{}",
            name,
            std::process::id()
        ));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn mirrors_pages_and_replaces_tags() {
        let root = scratch_dir("build");
        let input = root.join("docs");
        let output = root.join("site");
        fs::create_dir_all(input.join("models")).unwrap();
        fs::write(input.join("index.md"), "# Home\n").unwrap();
        fs::write(
            input.join("models/users.md"),
            "{% sqlalchemy table=\"users\" %}",
        )
        .unwrap();
        fs::write(input.join("notes.txt"), "{% sqlalchemy %}").unwrap();

        let snapshot = snapshot();
        let defaults = RenderConfig {
            fields: vec![Field::Column, Field::PrimaryKey],
            tick: "Y".to_string(),
            cross: "N".to_string(),
            show_indexes: false,
            show_constraints: false,
            ..GlobalConfig::new("schema.json").render_config()
        };
        let ctx = TagContext::new("sqlalchemy", defaults, &snapshot, &StandardDdl);

        let summary = build_site(&input, &output, &ctx, OnTagError::Abort).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                pages: 2,
                rewritten: 1
            }
        );

        assert_eq!(
            fs::read_to_string(output.join("index.md")).unwrap(),
            "# Home\n"
        );
        assert_eq!(
            fs::read_to_string(output.join("models/users.md")).unwrap(),
            "## `users`\n\n| column | primary_key |\n|:-------|:------------|\n| `id` | Y |"
        );
        assert!(!output.join("notes.txt").exists());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn failing_page_is_named_in_error() {
        let root = scratch_dir("failure");
        let input = root.join("docs");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("broken.md"), "{% sqlalchemy table=\"ghost\" %}").unwrap();

        let snapshot = snapshot();
        let ctx = TagContext::new(
            "sqlalchemy",
            GlobalConfig::new("schema.json").render_config(),
            &snapshot,
            &StandardDdl,
        );

        let err = build_site(&input, &root.join("site"), &ctx, OnTagError::Abort).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.md"));
        assert!(message.contains("table 'ghost' not found"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_cycle_is_not_followed() {
        let root = scratch_dir("cycle");
        let input = root.join("docs");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("index.md"), "# Home\n").unwrap();
        std::os::unix::fs::symlink(&input, input.join("loop")).unwrap();

        let pages = collect_pages(&input).unwrap();
        assert_eq!(pages, vec![input.join("index.md")]);

        fs::remove_dir_all(&root).unwrap();
    }
}
