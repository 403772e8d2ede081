//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::LoadMode;

/// Tree-table loading: first load, lazy child expansion and ancestor-reconciled search
#[derive(Parser, Debug)]
#[command(name = "treeload")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .treeload.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one tree query and print the resulting page
    Query(QueryArgs),

    /// Check the materialized-path invariants of a node file
    Validate {
        /// JSON node file (overrides data_file setting)
        #[arg(long, value_hint = ValueHint::FilePath)]
        data: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// JSON node file (overrides data_file setting)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Loading mode: sync | async (overrides load_mode setting)
    #[arg(short, long)]
    pub mode: Option<LoadMode>,

    /// Search keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Payload filter as key=value (repeatable)
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Node to expand
    #[arg(short, long)]
    pub parent_id: Option<String>,

    /// Operation hint, e.g. loadchild
    #[arg(short, long)]
    pub operation: Option<String>,

    /// Depth filter (roots are level 1)
    #[arg(long)]
    pub level: Option<u32>,

    /// Order clause: "<field> [asc|desc], ..."
    #[arg(long)]
    pub order: Option<String>,

    /// Page number, 1-based
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Page size (overrides page_size setting)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Print the page as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a config file template
    Template,
    /// Show config file locations
    Path,
}
