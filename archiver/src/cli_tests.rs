//! Tests for CLI parsing and config merging.

use super::*;
use crate::config::PublisherConfig;
use rstest::rstest;

const REQUIRED: [&str; 7] = [
    "model-archiver",
    "--model-name",
    "squeezenet",
    "--model-path",
    "/models/squeezenet",
    "--handler",
    "handler:handle",
];

fn parse(extra: &[&str]) -> Cli {
    Cli::parse_from(REQUIRED.iter().chain(extra))
}

fn settings(extra: &[&str], config: ArchiverConfig) -> Settings {
    parse(extra).settings(config).expect("settings merge")
}

#[test]
fn cli_parses_required_arguments_and_defaults() {
    let cli = parse(&[]);
    assert_eq!(cli.model_name, "squeezenet");
    assert_eq!(cli.model_path, PathBuf::from("/models/squeezenet"));
    assert_eq!(cli.handler, "handler:handle");
    assert!(cli.runtime.is_none());
    assert!(cli.archive_format.is_none());
    assert!(!cli.force);
    assert_eq!(cli.verbosity, 0);
}

#[rstest]
#[case::model_name("--model-name")]
#[case::model_path("--model-path")]
#[case::handler("--handler")]
fn cli_requires_core_arguments(#[case] missing: &str) {
    let mut args: Vec<&str> = Vec::new();
    let mut iter = REQUIRED.iter();
    while let Some(arg) = iter.next() {
        if *arg == missing {
            iter.next();
            continue;
        }
        args.push(*arg);
    }
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case::author_only(&["--author", "Jane"])]
#[case::email_only(&["--email", "jane@example.com"])]
fn cli_requires_author_and_email_together(#[case] extra: &[&str]) {
    assert!(Cli::try_parse_from(REQUIRED.iter().chain(extra)).is_err());
}

#[rstest]
#[case::short(&["-f"])]
#[case::long(&["--force"])]
fn cli_parses_force(#[case] extra: &[&str]) {
    assert!(parse(extra).force);
}

#[rstest]
#[case::default("default", ArchiveFormat::Default)]
#[case::tgz("tgz", ArchiveFormat::Tgz)]
fn cli_parses_archive_format(#[case] value: &str, #[case] expected: ArchiveFormat) {
    assert_eq!(
        parse(&["--archive-format", value]).archive_format,
        Some(expected)
    );
}

#[test]
fn cli_rejects_unknown_archive_format() {
    assert!(Cli::try_parse_from(REQUIRED.iter().chain(&["--archive-format", "zip"])).is_err());
}

#[rstest]
#[case::quiet(&[], LevelFilter::Warn)]
#[case::info(&["-v"], LevelFilter::Info)]
#[case::debug(&["-vv"], LevelFilter::Debug)]
#[case::trace(&["-vvv"], LevelFilter::Trace)]
fn verbosity_selects_log_level(#[case] extra: &[&str], #[case] expected: LevelFilter) {
    assert_eq!(parse(extra).log_level(), expected);
}

#[test]
fn settings_use_built_in_defaults() {
    let merged = settings(&["--created-on", "2026-10-16T09:30:00Z"], ArchiverConfig::default());
    let params = merged.params;
    assert_eq!(params.model_name.as_str(), "squeezenet");
    assert_eq!(params.export_path, PathBuf::from("."));
    assert_eq!(params.format, ArchiveFormat::Default);
    assert!(!params.overwrite);
    assert_eq!(params.manifest.runtime, Runtime::Python);
    assert_eq!(params.manifest.created_on.as_str(), "2026-10-16T09:30:00Z");
    assert!(params.manifest.publisher.is_none());
    assert_eq!(merged.converter, ConverterConfig::default());
}

#[test]
fn settings_fall_back_to_config_values() {
    let config = ArchiverConfig {
        export_path: Some(PathBuf::from("/srv/models")),
        runtime: Some(Runtime::Python3),
        archive_format: Some(ArchiveFormat::Tgz),
        publisher: Some(PublisherConfig {
            author: "Config Author".to_owned(),
            email: "config@example.com".to_owned(),
        }),
        converter: ConverterConfig {
            onnx_program: "/opt/bin/convert".to_owned(),
        },
    };

    let merged = settings(&[], config);
    let params = merged.params;
    assert_eq!(params.export_path, PathBuf::from("/srv/models"));
    assert_eq!(params.format, ArchiveFormat::Tgz);
    assert_eq!(params.manifest.runtime, Runtime::Python3);
    assert_eq!(
        params.manifest.publisher.map(|publisher| publisher.author),
        Some("Config Author".to_owned())
    );
    assert_eq!(merged.converter.onnx_program, "/opt/bin/convert");
}

#[test]
fn command_line_overrides_config() {
    let config = ArchiverConfig {
        export_path: Some(PathBuf::from("/srv/models")),
        runtime: Some(Runtime::Python3),
        archive_format: Some(ArchiveFormat::Tgz),
        publisher: Some(PublisherConfig {
            author: "Config Author".to_owned(),
            email: "config@example.com".to_owned(),
        }),
        converter: ConverterConfig::default(),
    };

    let merged = settings(
        &[
            "--export-path",
            "dist",
            "--runtime",
            "python2",
            "--archive-format",
            "default",
            "--author",
            "Jane Doe",
            "--email",
            "jane@example.com",
            "--converter",
            "my-convert",
            "--engine",
            "MXNet",
        ],
        config,
    );
    let params = merged.params;
    assert_eq!(params.export_path, PathBuf::from("dist"));
    assert_eq!(params.format, ArchiveFormat::Default);
    assert_eq!(params.manifest.runtime, Runtime::Python2);
    assert_eq!(params.manifest.engine.as_deref(), Some("MXNet"));
    assert_eq!(
        params.manifest.publisher,
        Some(Publisher {
            author: "Jane Doe".to_owned(),
            email: "jane@example.com".to_owned(),
        })
    );
    assert_eq!(merged.converter.onnx_program, "my-convert");
}

#[test]
fn settings_reject_invalid_model_name() {
    let cli = Cli::parse_from([
        "model-archiver",
        "--model-name",
        "bad name!",
        "--model-path",
        "/models",
        "--handler",
        "h",
    ]);
    let err = cli
        .settings(ArchiverConfig::default())
        .expect_err("invalid name");
    assert!(
        matches!(err, CliError::Archive(ArchiveError::InvalidName { .. })),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case::date_only("2026-10-16")]
#[case::offset("2026-10-16T09:30:00+01:00")]
#[case::garbage("yesterday")]
fn settings_reject_malformed_timestamps(#[case] value: &str) {
    let err = parse(&["--created-on", value])
        .settings(ArchiverConfig::default())
        .expect_err("invalid timestamp");
    assert!(
        matches!(err, CliError::InvalidTimestamp(ref raw) if raw == value),
        "unexpected error: {err:?}"
    );
}

#[test]
fn settings_default_timestamp_is_current_utc() {
    let merged = settings(&[], ArchiverConfig::default());
    assert!(is_iso8601_utc(merged.params.manifest.created_on.as_str()));
}
