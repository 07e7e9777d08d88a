mod logging;
mod site;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemadoc_core::SchemaSnapshot;
use schemadoc_provider::{CachedProvider, JsonFileProvider, ProviderOptions, SchemaProvider};
use schemadoc_render::{
    DEFAULT_TAG, GlobalConfig, OnTagError, RenderError, StandardDdl, TagArguments, TagContext,
    resolve,
};
use thiserror::Error;

use logging::init_logging;
use site::build_site;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}: {source}", path.display())]
    Page { path: PathBuf, source: RenderError },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

impl From<schemadoc_core::Error> for CliError {
    fn from(err: schemadoc_core::Error) -> Self {
        CliError::Render(RenderError::from(err))
    }
}

#[derive(Parser, Debug)]
#[command(name = "schemadoc", version, about = "Render schema documentation into markdown")]
struct Cli {
    /// Path to the settings file.
    #[arg(long, global = true, default_value = "schemadoc.toml")]
    config: PathBuf,
    /// Append JSON logs to this file instead of writing to stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Log debug events.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the settings and load the schema snapshot.
    Check,
    /// Resolve one tag and print the markdown.
    Render(RenderArgs),
    /// Replace tags in every markdown page of a directory.
    Build(BuildArgs),
    /// Print the JSON Schema of snapshot documents.
    Schema,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Tag arguments as KEY=VALUE (e.g. table=users show_sql=true).
    #[arg(value_name = "KEY=VALUE")]
    arguments: Vec<String>,
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory containing the source pages.
    #[arg(long)]
    input: PathBuf,
    /// Directory receiving the rendered pages.
    #[arg(long)]
    output: PathBuf,
    /// Tag literal to replace.
    #[arg(long, default_value = DEFAULT_TAG)]
    tag: String,
    /// How to handle a tag that fails to render.
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Abort)]
    on_error: ErrorPolicy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ErrorPolicy {
    Abort,
    Inline,
}

impl From<ErrorPolicy> for OnTagError {
    fn from(policy: ErrorPolicy) -> Self {
        match policy {
            ErrorPolicy::Abort => OnTagError::Abort,
            ErrorPolicy::Inline => OnTagError::Inline,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        let schema = schemars::schema_for!(SchemaSnapshot);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    init_logging(cli.log_file.as_deref(), cli.verbose)?;

    let config = load_config(&cli.config)?;
    tracing::info!(event = "config_loaded", path = %cli.config.display());

    let provider = CachedProvider::new(JsonFileProvider::new(provider_options(
        &config,
        &cli.config,
    )));
    let snapshot = provider.get(&config.base_class)?;

    match cli.command {
        Command::Check => {
            println!(
                "configuration ok: {} table(s) in {} ({} provider)",
                snapshot.len(),
                config.base_class,
                provider.kind()
            );
            Ok(())
        }
        Command::Render(args) => run_render(args, &config, &snapshot),
        Command::Build(args) => run_build(args, &config, &snapshot),
        Command::Schema => Ok(()),
    }
}

fn load_config(path: &Path) -> Result<GlobalConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        CliError::InvalidConfig(format!("cannot read {}: {}", path.display(), err))
    })?;
    Ok(GlobalConfig::from_toml_str(&contents)?)
}

/// Search paths in the settings are relative to the settings file.
fn provider_options(config: &GlobalConfig, config_path: &Path) -> ProviderOptions {
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let anchor = |path: &PathBuf| {
        if path.is_absolute() {
            path.clone()
        } else {
            base.join(path)
        }
    };

    ProviderOptions {
        app_path: config.app_path.as_ref().map(anchor),
        search_paths: config.search_paths.iter().map(anchor).collect(),
    }
}

fn parse_cli_arguments(raw: &[String]) -> Result<TagArguments, CliError> {
    let mut arguments = TagArguments::new();
    for item in raw {
        let (key, value) = item.split_once('=').ok_or_else(|| {
            CliError::InvalidConfig(format!("expected KEY=VALUE, got '{item}'"))
        })?;
        arguments.insert(key.trim(), value);
    }
    Ok(arguments)
}

fn run_render(
    args: RenderArgs,
    config: &GlobalConfig,
    snapshot: &SchemaSnapshot,
) -> Result<(), CliError> {
    let arguments = parse_cli_arguments(&args.arguments)?;
    let output = resolve(&arguments, &config.render_config(), snapshot, &StandardDdl)?;
    println!("{output}");
    Ok(())
}

fn run_build(
    args: BuildArgs,
    config: &GlobalConfig,
    snapshot: &SchemaSnapshot,
) -> Result<(), CliError> {
    if !args.input.is_dir() {
        return Err(CliError::InvalidConfig(format!(
            "input directory not found: {}",
            args.input.display()
        )));
    }

    let timer = Instant::now();
    tracing::info!(
        event = "build_started",
        input = %args.input.display(),
        output = %args.output.display()
    );

    let ctx = TagContext::new(&args.tag, config.render_config(), snapshot, &StandardDdl);
    let summary = build_site(&args.input, &args.output, &ctx, args.on_error.into())?;

    tracing::info!(
        event = "build_finished",
        pages = summary.pages,
        rewritten = summary.rewritten,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}
