use clap::Parser;
use jinjautils::cli::Args;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("jinjautils")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["app.conf.j2", "./output", "app.conf"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, "app.conf.j2");
    assert_eq!(parsed.output_dir, PathBuf::from("./output"));
    assert_eq!(parsed.output_file, "app.conf");
    assert!(parsed.template_dir.is_none());
    assert!(parsed.set.is_empty());
    assert!(!parsed.no_backup);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--template-dir",
        "./templates",
        "--vars",
        "vars.yaml",
        "--set",
        "name=demo",
        "-s",
        "port=80",
        "--no-backup",
        "--no-trim-blocks",
        "--no-lstrip-blocks",
        "--verbose",
        "app.conf.j2",
        "./output",
        "app.conf",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template_dir, Some(PathBuf::from("./templates")));
    assert_eq!(parsed.vars, Some(PathBuf::from("vars.yaml")));
    assert_eq!(parsed.set, vec!["name=demo".to_string(), "port=80".to_string()]);
    assert!(parsed.no_backup);
    assert!(parsed.no_trim_blocks);
    assert!(parsed.no_lstrip_blocks);
    assert!(parsed.verbose);
}

#[test]
fn test_missing_args() {
    let args = make_args(&["app.conf.j2", "./output"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["a.j2", "./output", "a", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
