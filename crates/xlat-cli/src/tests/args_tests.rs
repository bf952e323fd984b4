use crate::args::{CliArgs, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["xlat", "hierarchy.json"]).expect("parse args");

    assert_eq!(args.input, PathBuf::from("hierarchy.json"));
    assert_eq!(args.format, OutputFormat::Text);
    assert!(args.classes.is_empty());
    assert_eq!(args.jobs, None);
    assert!(!args.no_color);
    assert!(!args.pretty);
    assert_eq!(args.root_type, None);
    assert!(!args.no_check_missing);
}

#[test]
fn parses_repeated_class_filters() {
    let args = CliArgs::try_parse_from([
        "xlat",
        "hierarchy.json",
        "--class",
        "C2",
        "--class",
        "C3",
    ])
    .expect("parse args");

    assert_eq!(args.classes, ["C2", "C3"]);
}

#[test]
fn parses_format_case_insensitively() {
    let args = CliArgs::try_parse_from(["xlat", "--format", "JSON", "--pretty", "in.json"])
        .expect("parse args");

    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.pretty);
}

#[test]
fn parses_synthesis_overrides() {
    let args = CliArgs::try_parse_from([
        "xlat",
        "in.json",
        "-j",
        "4",
        "--root-type",
        "java.lang.Object",
        "--no-check-missing",
        "--no-color",
    ])
    .expect("parse args");

    assert_eq!(args.jobs, Some(4));
    assert_eq!(args.root_type.as_deref(), Some("java.lang.Object"));
    assert!(args.no_check_missing);
    assert!(args.no_color);
}

#[test]
fn rejects_missing_input() {
    assert!(CliArgs::try_parse_from(["xlat"]).is_err());
}

#[test]
fn rejects_disabling_native_contract_checks() {
    assert!(CliArgs::try_parse_from(["xlat", "in.json", "--no-check-native"]).is_err());
}

#[test]
fn rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["xlat", "in.json", "--format", "yaml"]).is_err());
}
