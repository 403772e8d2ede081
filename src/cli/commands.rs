//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, QueryArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Query;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InMemoryDataSource, InfraError};

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };

    match &cli.command {
        Some(Commands::Query(args)) => run_query(&config_dir, args).await,
        Some(Commands::Validate { data }) => validate(&config_dir, data.as_deref()),
        Some(Commands::Config { command }) => run_config(&config_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn load_settings(config_dir: &Path, data: Option<&Path>) -> CliResult<Settings> {
    let mut settings = Settings::load(Some(config_dir))?;
    if let Some(data) = data {
        settings.data_file = Some(data.to_path_buf());
    }
    Ok(settings)
}

/// Translate `key=value` flags into query filters.
pub fn parse_filters(raw: &[String]) -> CliResult<Vec<(String, String)>> {
    raw.iter()
        .map(|f| {
            f.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| CliError::InvalidArgs(format!("filter '{f}' is not KEY=VALUE")))
        })
        .collect()
}

/// Build the inbound query from command-line flags.
pub fn build_query(args: &QueryArgs, settings: &Settings) -> CliResult<Query<String>> {
    let mut query = Query::new().with_page(args.page, args.page_size.unwrap_or(settings.page_size));
    query.keyword = args.keyword.clone();
    query.parent_id = args.parent_id.clone();
    query.operation = args.operation.clone();
    query.level = args.level;
    query.order = args.order.clone().unwrap_or_default();
    for (k, v) in parse_filters(&args.filters)? {
        query.filters.insert(k, v);
    }
    Ok(query)
}

#[instrument(skip(args))]
async fn run_query(config_dir: &Path, args: &QueryArgs) -> CliResult<()> {
    let settings = load_settings(config_dir, args.data.as_deref())?;
    let mode = args.mode.unwrap_or(settings.load_mode);
    let query = build_query(args, &settings)?;
    debug!("run_query: mode={mode} query={query:?}");

    let container = ServiceContainer::new(settings)?;
    let page = container.tree_load.handle_query(query, mode).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&page)
            .map_err(|e| InfraError::parse("serialize page", e))?;
        output::info(&json);
    } else {
        output::tree_page(&page);
    }
    Ok(())
}

#[instrument]
fn validate(config_dir: &Path, data: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(config_dir, data)?;
    let file: PathBuf = settings.data_file.clone().ok_or_else(|| {
        CliError::InvalidArgs("no data file given (use --data or data_file setting)".to_string())
    })?;
    let source = InMemoryDataSource::from_json_file(&file, settings.codec())?;
    source.validate().map_err(ApplicationError::from)?;
    output::success(&format!("{}: {} nodes, paths consistent", file.display(), source.len()));
    Ok(())
}

fn run_config(config_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(config_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::info(&format!("global: {}", p.display())),
                None => output::warning("global config directory unavailable"),
            }
            output::info(&format!("local:  {}", local_config_path(config_dir).display()));
        }
    }
    Ok(())
}
