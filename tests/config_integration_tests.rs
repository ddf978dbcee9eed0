//! Settings file loading through the public configuration API
use std::io::Write;

use clap::Parser;
use gcode_toolpath::config::{Args, Config, View};
use tempfile::NamedTempFile;

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write settings");
    file
}

#[test]
fn test_explicit_settings_file_applies() {
    let file = settings_file("grouped = true\nbatch_size = 250\npretty = true\n");
    let path = file.path().to_str().expect("utf-8 path");

    let args = Args::parse_from(["gcode-inspect", "part.gcode", "--config", path]);
    let config = Config::from_args(args).expect("create config");

    assert!(config.grouped);
    assert_eq!(config.batch_size, 250);
    assert!(config.pretty);
    assert_eq!(config.view, View::All);
    assert_eq!(config.config_file.as_deref(), Some(file.path()));
}

#[test]
fn test_cli_flags_override_settings_file() {
    let file = settings_file("batch_size = 250\n");
    let path = file.path().to_str().expect("utf-8 path");

    let args = Args::parse_from([
        "gcode-inspect",
        "part.gcode",
        "--config",
        path,
        "--batch-size",
        "16",
        "--view",
        "toolpath",
    ]);
    let config = Config::from_args(args).expect("create config");

    assert_eq!(config.batch_size, 16);
    assert_eq!(config.view, View::Toolpath);
    assert!(!config.grouped);
}

#[test]
fn test_missing_explicit_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("absent.toml");

    let args = Args::parse_from([
        "gcode-inspect",
        "part.gcode",
        "--config",
        missing.to_str().expect("utf-8 path"),
    ]);
    let err = Config::from_args(args).expect_err("missing file");
    assert!(format!("{err:#}").contains("Failed to read settings file"));
}

#[test]
fn test_malformed_settings_file_is_an_error() {
    let file = settings_file("grouped = \"sometimes\"\n");
    let path = file.path().to_str().expect("utf-8 path");

    let args = Args::parse_from(["gcode-inspect", "part.gcode", "--config", path]);
    let err = Config::from_args(args).expect_err("bad value");
    assert!(format!("{err:#}").contains("Failed to parse settings file"));
}
