use std::path::Path;

use schemadoc_core::SchemaSnapshot;
use schemadoc_provider::{JsonFileProvider, ProviderOptions, SchemaProvider, StaticProvider};
use schemadoc_render::{
    Field, GlobalConfig, OnTagError, RenderConfig, RenderError, StandardDdl, TagArguments,
    TagContext, TagValue, merge, parse_arguments, process_markdown, resolve,
};

fn fixture() -> SchemaSnapshot {
    let provider = JsonFileProvider::new(ProviderOptions {
        app_path: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")),
        search_paths: Vec::new(),
    });
    provider
        .load("blog.schema.json")
        .expect("load blog fixture")
}

fn defaults() -> RenderConfig {
    GlobalConfig::new("blog.schema.json").render_config()
}

fn headings(markdown: &str) -> Vec<&str> {
    markdown
        .lines()
        .filter(|line| line.starts_with('#'))
        .collect()
}

fn header_row(markdown: &str) -> Vec<String> {
    let line = markdown
        .lines()
        .find(|line| line.starts_with("| "))
        .expect("table header row");
    line.trim_start_matches("| ")
        .trim_end_matches(" |")
        .split(" | ")
        .map(str::to_string)
        .collect()
}

#[test]
fn renders_every_table_in_snapshot_order() {
    let snapshot = fixture();
    let output = resolve(&TagArguments::new(), &defaults(), &snapshot, &StandardDdl).unwrap();

    assert_eq!(
        headings(&output),
        vec!["## `users`", "## `sales.orders`", "## `audit_log`"]
    );
    assert!(output.contains("**Indexes:**\n\n- `ix_users_email`: `email`"));
    assert!(output.contains("- `ck_orders_total` (check: `total >= 0`)"));
    assert!(!output.contains("```sql"));
}

#[test]
fn groups_by_schema_with_unscoped_group_first_seen() {
    let snapshot = fixture();
    let arguments = TagArguments::new()
        .with("include", "users,orders")
        .with("group_by_schema", true);
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();

    assert_eq!(
        headings(&output),
        vec!["# unscoped", "## `users`", "# `sales`", "## `sales.orders`"]
    );
}

#[test]
fn include_and_exclude_same_table_renders_nothing() {
    let snapshot = fixture();
    let arguments = TagArguments::new()
        .with("include_tables", "users")
        .with("exclude_tables", "users");
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();
    assert_eq!(output, "");
}

#[test]
fn selector_bypasses_global_exclude() {
    let snapshot = fixture();
    let global = RenderConfig {
        exclude_tables: vec!["users".to_string()],
        ..defaults()
    };

    let all = resolve(&TagArguments::new(), &global, &snapshot, &StandardDdl).unwrap();
    assert!(!all.contains("## `users`"));

    let single = resolve(
        &TagArguments::new().with("table", "users"),
        &global,
        &snapshot,
        &StandardDdl,
    )
    .unwrap();
    assert_eq!(headings(&single), vec!["## `users`"]);
}

#[test]
fn non_nullable_column_shows_cross() {
    let snapshot = fixture();
    let arguments = TagArguments::new()
        .with("table", "users")
        .with("fields", "column,nullable")
        .with("tick", "✔️")
        .with("cross", "❌")
        .with("show_indexes", false)
        .with("show_constraints", false);
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();

    assert!(output.contains("| `username` | ❌ |"));
    assert!(output.contains("| `is_active` | ✔️ |"));
}

#[test]
fn header_row_round_trips_configured_fields() {
    let snapshot = fixture();
    let arguments = TagArguments::new()
        .with("table", "orders")
        .with("fields", "references,column,type,default");
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();

    let parsed: Vec<Field> = header_row(&output)
        .iter()
        .map(|name| Field::parse(name).expect("recognized field"))
        .collect();
    assert_eq!(
        parsed,
        vec![Field::References, Field::Column, Field::Type, Field::Default]
    );
    assert!(output.contains("| *users&period;id* | `user_id` | INTEGER |  |"));
    assert!(output.contains("| `total` | NUMERIC(10, 2) | 0 |"));
}

#[test]
fn overriding_one_key_is_a_minimal_diff() {
    let global = defaults();
    let cases: Vec<(&str, TagValue)> = vec![
        ("tick", TagValue::from("Y")),
        ("heading_level", TagValue::Int(4)),
        ("text_align", TagValue::from("right")),
        ("show_sql", TagValue::Bool(true)),
        ("sql_dialect", TagValue::from("mysql")),
        ("exclude", TagValue::from("audit_log")),
        ("sort_by", TagValue::from("name")),
    ];

    for (key, value) in cases {
        let merged = merge(&global, &TagArguments::new().with(key, value)).unwrap();
        let restored = RenderConfig {
            tick: global.tick.clone(),
            heading_level: global.heading_level,
            text_align: global.text_align,
            show_sql: global.show_sql,
            sql_dialect: global.sql_dialect.clone(),
            exclude_tables: global.exclude_tables.clone(),
            sort_by: global.sort_by,
            ..merged.clone()
        };
        assert_eq!(restored, global, "override of {key} touched other fields");
        assert_ne!(merged, global, "override of {key} had no effect");
    }
}

#[test]
fn sql_block_uses_requested_dialect() {
    let snapshot = fixture();
    let arguments = TagArguments::new()
        .with("table", "orders")
        .with("show_sql", true)
        .with("sql_dialect", "mysql");
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();

    assert!(output.contains("```sql\nCREATE TABLE `sales`.`orders` ("));
    assert!(output.contains("\tCONSTRAINT `pk_orders` PRIMARY KEY (`id`),"));
    assert!(output.contains("\tFOREIGN KEY (`user_id`) REFERENCES `users` (`id`)\n);\n```"));
}

#[test]
fn errors_propagate_with_their_kind() {
    let snapshot = fixture();
    let global = defaults();

    let err = resolve(
        &TagArguments::new().with("colour", "red"),
        &global,
        &snapshot,
        &StandardDdl,
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::UnknownOption { .. }));

    let err = resolve(
        &TagArguments::new().with("table", "missing"),
        &global,
        &snapshot,
        &StandardDdl,
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::TableNotFound(_)));

    let err = resolve(
        &TagArguments::new()
            .with("show_sql", true)
            .with("sql_dialect", "cobol"),
        &global,
        &snapshot,
        &StandardDdl,
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedDialect(_)));

    let err: RenderError = StaticProvider::new()
        .load("app.models.Base")
        .unwrap_err()
        .into();
    assert!(matches!(
        err,
        RenderError::Schema(schemadoc_core::Error::SchemaLoad(_))
    ));
}

#[test]
fn processes_every_tag_in_a_page() {
    let snapshot = fixture();
    let ctx = TagContext::new("sqlalchemy", defaults(), &snapshot, &StandardDdl);
    let page = "# Data model\n\n{% sqlalchemy table=\"audit_log\" show_indexes=false show_constraints=false fields=\"column,type\" %}\n\nSee also:\n\n{% sqlalchemy include=\"nothing\" %}\n";

    let output = process_markdown(page, &ctx, OnTagError::Abort).unwrap();
    assert_eq!(
        output,
        "# Data model\n\n## `audit_log`\n\n| column | type |\n|:-------|:-----|\n| `id` | INTEGER |\n| `message` | TEXT |\n\nSee also:\n\n\n"
    );
}

#[test]
fn page_without_tags_is_unchanged() {
    let snapshot = fixture();
    let ctx = TagContext::new("sqlalchemy", defaults(), &snapshot, &StandardDdl);
    let page = "# Nothing here\n\n{% raw %}\n";
    assert_eq!(process_markdown(page, &ctx, OnTagError::Abort).unwrap(), page);
}

#[test]
fn failing_tag_aborts_or_renders_inline() {
    let snapshot = fixture();
    let ctx = TagContext::new("sqlalchemy", defaults(), &snapshot, &StandardDdl);
    let page = "before\n{% sqlalchemy table=\"ghost\" %}\nafter";

    let err = process_markdown(page, &ctx, OnTagError::Abort).unwrap_err();
    assert!(matches!(err, RenderError::TableNotFound(ref name) if name == "ghost"));

    let output = process_markdown(page, &ctx, OnTagError::Inline).unwrap();
    assert_eq!(
        output,
        "before\n> **schemadoc error:** table 'ghost' not found in schema\nafter"
    );
}

#[test]
fn tag_text_parses_into_overrides() {
    let snapshot = fixture();
    let arguments =
        parse_arguments(r#"table="users" fields="column" heading_level=4 show_indexes=false show_constraints=false"#)
            .unwrap();
    let output = resolve(&arguments, &defaults(), &snapshot, &StandardDdl).unwrap();
    assert!(output.starts_with("#### `users`\n\nApplication accounts.\n\n| column |"));
}

#[test]
fn sort_by_name_reorders_multi_table_output() {
    let snapshot = fixture();
    let sorted = resolve(
        &TagArguments::new().with("sort_by", "name"),
        &defaults(),
        &snapshot,
        &StandardDdl,
    )
    .unwrap();
    assert_eq!(
        headings(&sorted),
        vec!["## `audit_log`", "## `sales.orders`", "## `users`"]
    );

    let unsorted = resolve(
        &TagArguments::new().with("sort_by", "none"),
        &defaults(),
        &snapshot,
        &StandardDdl,
    )
    .unwrap();
    assert_eq!(
        headings(&unsorted),
        vec!["## `users`", "## `sales.orders`", "## `audit_log`"]
    );
}

#[test]
fn mid_line_failure_renders_as_its_own_blockquote() {
    let snapshot = fixture();
    let ctx = TagContext::new("sqlalchemy", defaults(), &snapshot, &StandardDdl);
    let page = "See {% sqlalchemy table=\"ghost\" %} for details.";

    let output = process_markdown(page, &ctx, OnTagError::Inline).unwrap();
    assert_eq!(
        output,
        "See \n\n> **schemadoc error:** table 'ghost' not found in schema\n\n for details."
    );
}

#[test]
fn context_is_shared_across_threads() {
    let snapshot = fixture();
    let ctx = TagContext::new("sqlalchemy", defaults(), &snapshot, &StandardDdl);
    let page = "{% sqlalchemy table=\"users\" fields=\"column\" %}";

    let expected = process_markdown(page, &ctx, OnTagError::Abort).unwrap();
    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| process_markdown(page, &ctx, OnTagError::Abort).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert!(outputs.iter().all(|output| *output == expected));
}
