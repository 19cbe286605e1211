//! Tests for CLI parsing and offline commands

use super::runner::Runner;
use super::*;
use crate::error::Error;
use crate::types::{Operation, Platform, Resource};
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

#[test]
fn test_parse_check_default_platform() {
    let cli = Cli::try_parse_from(["webinarjam", "check"]).unwrap();
    match cli.command {
        Commands::Check { platform } => assert_eq!(platform, Platform::WebinarJam),
        other => panic!("Expected Check, got {other:?}"),
    }
    assert_eq!(cli.format, OutputFormat::Json);
    assert!(!cli.verbose);
}

#[test]
fn test_parse_check_everwebinar() {
    let cli = Cli::try_parse_from(["webinarjam", "check", "--platform", "everwebinar"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Check {
            platform: Platform::EverWebinar
        }
    ));
}

#[test]
fn test_parse_run() {
    let cli = Cli::try_parse_from([
        "webinarjam",
        "-C",
        "config.yaml",
        "run",
        "--resource",
        "webinarJam",
        "--operation",
        "getRegistrants",
        "--params",
        r#"{"webinarId": 5}"#,
        "--return-all",
    ])
    .unwrap();

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("config.yaml")));
    match cli.command {
        Commands::Run {
            resource,
            operation,
            params,
            return_all,
            limit,
            dry_run,
            ..
        } => {
            assert_eq!(resource, Resource::WebinarJam);
            assert_eq!(operation, Operation::GetRegistrants);
            assert_eq!(params.as_deref(), Some(r#"{"webinarId": 5}"#));
            assert!(return_all);
            assert_eq!(limit, 1);
            assert!(!dry_run);
        }
        other => panic!("Expected Run, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_operation() {
    let result = Cli::try_parse_from([
        "webinarjam",
        "describe",
        "--resource",
        "webinarJam",
        "--operation",
        "delete",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_params_conflict() {
    let result = Cli::try_parse_from([
        "webinarjam",
        "run",
        "--resource",
        "general",
        "--operation",
        "getCountries",
        "--params",
        "{}",
        "--params-file",
        "p.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_load_params_inline() {
    let params = Runner::load_params(Some(r#"{"webinarId": 9, "email": null}"#), None).unwrap();
    assert_eq!(params.get("webinarId").map(|v| v.to_json()), Some(json!(9)));
    assert!(params.present("email").is_none());
}

#[test]
fn test_load_params_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"additionalRegisterFields": {{"phone": "555"}}}}"#).unwrap();

    let params = Runner::load_params(None, Some(file.path())).unwrap();
    assert_eq!(
        params
            .lookup("additionalRegisterFields.phone")
            .map(|v| v.to_json()),
        Some(json!("555"))
    );
}

#[test]
fn test_load_params_rejects_non_object() {
    let err = Runner::load_params(Some("[1, 2]"), None).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
    assert!(Runner::load_params(None, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_offline_commands_run() {
    for args in [
        vec!["webinarjam", "operations"],
        vec!["webinarjam", "validate"],
        vec![
            "webinarjam",
            "describe",
            "--resource",
            "everWebinar",
            "--operation",
            "register",
        ],
    ] {
        let runner = Runner::new(Cli::try_parse_from(args).unwrap());
        runner.run().await.unwrap();
    }
}

#[tokio::test]
async fn test_describe_missing_operation() {
    let cli = Cli::try_parse_from([
        "webinarjam",
        "describe",
        "--resource",
        "general",
        "--operation",
        "unsubscribe",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::UnknownOperation { .. }));
}
