use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("compact-json").expect("Binary is built");
    cmd.env("RUST_LOG", "off");
    cmd
}

fn input(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("input.json");
    fs::write(&path, content).expect("Failed to write input");
    path.to_string_lossy().into_owned()
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run");
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).expect("UTF-8 output")
}

fn stderr(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run");
    assert!(!output.status.success(), "{output:?}");
    String::from_utf8(output.stderr).expect("UTF-8 output")
}

#[test]
fn compile_to_stdout() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = input(&dir, r#"{"a": [1, 2], "b": [1, 2]}"#);
    let source = stdout(cli().args(["compile", &path, "--name", "settings"]));
    assert!(source.starts_with("// @generated by compact-json"));
    assert!(source.contains("pub mod settings {"));
    assert!(source.contains("pub fn get() -> ::compact_json::Document<'static> {"));
    assert!(source.contains("static RECORDS: [::compact_json::Record; 2usize]"));
}

#[test]
fn compile_to_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = input(&dir, r#"{"a": [1, 2], "b": [1, 2]}"#);
    let output = dir.path().join("settings.rs");
    let printed = stdout(cli().args([
        "compile",
        &path,
        "--name",
        "settings",
        "--no-dedup",
        "--output",
        &output.to_string_lossy(),
    ]));
    assert!(printed.is_empty());
    let source = fs::read_to_string(&output).expect("Module is written");
    assert!(source.contains("static RECORDS: [::compact_json::Record; 4usize]"));
}

#[test]
fn inspect() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = input(&dir, r#"{"a": [1, 2], "b": [1, 2]}"#);
    let report = stdout(cli().args(["inspect", &path]));
    assert_eq!(
        report,
        "nodes: 7\n\
         records: 2\n\
         pairs: 2\n\
         string bytes: 0\n\
         shared slots: 1 (arrays: 1, objects: 0, members: 0, strings: 0)\n\
         reused: 1\n"
    );
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing.json");
    let message = stderr(cli().args(["inspect", &path.to_string_lossy()]));
    assert!(message.contains("Failed to read"), "{message}");
}

#[test]
fn invalid_json() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = input(&dir, "{\"a\": ");
    let message = stderr(cli().args(["compile", &path, "--name", "settings"]));
    assert!(message.contains("Invalid JSON"), "{message}");
}

#[test]
fn invalid_module_name() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = input(&dir, "[]");
    let message = stderr(cli().args(["compile", &path, "--name", "1st"]));
    assert!(message.contains("Invalid module name: `1st`"), "{message}");
}
