//! Tests for CLI argument handling and error mapping

use std::path::PathBuf;

use clap::Parser;

use treeload::application::ApplicationError;
use treeload::cli::args::{Cli, Commands};
use treeload::cli::commands::{build_query, parse_filters};
use treeload::cli::CliError;
use treeload::config::Settings;
use treeload::domain::{DomainError, LoadMode, LoadOperation};
use treeload::exitcode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("treeload").chain(args.iter().copied())).unwrap()
}

#[test]
fn given_query_flags_when_parsing_then_query_is_built() {
    // Arrange
    let cli = parse(&[
        "query",
        "--data",
        "nodes.json",
        "--mode",
        "async",
        "-k",
        "sales",
        "-f",
        "kind=region",
        "--order",
        "name desc",
        "--page",
        "2",
    ]);
    let Some(Commands::Query(args)) = cli.command else {
        panic!("expected query command");
    };
    let settings = Settings::default();

    // Act
    let query = build_query(&args, &settings).unwrap();

    // Assert
    assert_eq!(args.mode, Some(LoadMode::Async));
    assert_eq!(args.data, Some(PathBuf::from("nodes.json")));
    assert_eq!(query.keyword.as_deref(), Some("sales"));
    assert_eq!(query.filters.get("kind").map(String::as_str), Some("region"));
    assert_eq!(query.order, "name desc");
    assert_eq!(query.page_index, 2);
    assert_eq!(query.page_size, settings.page_size);
    assert_eq!(LoadOperation::resolve(&query), LoadOperation::Search);
}

#[test]
fn given_loadchild_flags_when_building_query_then_resolves_to_load_child() {
    let cli = parse(&["query", "-o", "loadchild", "-p", "X", "--page-size", "5"]);
    let Some(Commands::Query(args)) = cli.command else {
        panic!("expected query command");
    };

    let query = build_query(&args, &Settings::default()).unwrap();

    assert_eq!(query.parent_id.as_deref(), Some("X"));
    assert_eq!(query.page_size, 5);
    assert_eq!(LoadOperation::resolve(&query), LoadOperation::LoadChild);
}

#[test]
fn given_unknown_mode_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["treeload", "query", "--mode", "lazy"]);
    assert!(result.is_err());
}

#[test]
fn given_filter_without_equals_when_parsing_filters_then_invalid_args() {
    let err = parse_filters(&["kind".to_string()]).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_filter_with_spaces_when_parsing_filters_then_trimmed() {
    let filters = parse_filters(&[" kind = team ".to_string()]).unwrap();
    assert_eq!(filters, vec![("kind".to_string(), "team".to_string())]);
}

#[test]
fn given_domain_errors_when_mapping_exit_codes_then_distinguishable() {
    let validation = CliError::from(ApplicationError::from(DomainError::validation(
        "parent id required",
    )));
    let not_found = CliError::from(ApplicationError::from(DomainError::node_not_found("X")));
    let config = CliError::from(ApplicationError::Config {
        message: "bad".to_string(),
    });

    assert_eq!(validation.exit_code(), exitcode::DATAERR);
    assert_eq!(not_found.exit_code(), exitcode::NOINPUT);
    assert_eq!(config.exit_code(), exitcode::CONFIG);
}
