//! Integration tests for mhlcheck CLI

use std::process::{Command, Output};
use tempfile::TempDir;

fn mhlcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mhlcheck"))
        .args(args)
        .env_remove("MHLCHECK_OUTPUT")
        .env_remove("MHLCHECK_COLOR")
        .env_remove("MHLCHECK_STRICT_COMPLETENESS")
        .output()
        .expect("Failed to execute mhlcheck")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

fn config(dir: &TempDir) -> String {
    write(dir, "config.toml", "[general]\ncolor = \"never\"\n")
}

#[test]
fn test_cli_version() {
    let output = mhlcheck(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mhlcheck"));
}

#[test]
fn test_cli_help() {
    let output = mhlcheck(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Verification oracle for media hash list tools"));
    assert!(stdout.contains("compare"));
    assert!(stdout.contains("manifest"));
    assert!(stdout.contains("sequence"));
}

#[test]
fn test_cli_invalid_command() {
    let output = mhlcheck(&["invalid-command"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_hash_empty_file() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let empty = write(&dir, "empty.bin", "");

    let output = mhlcheck(&[
        "--config", &cfg, "hash", &empty, "-t", "md5", "-t", "XXHash64BE",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("MD5({empty})= d41d8cd98f00b204e9800998ecf8427e")));
    assert!(stdout.contains(&format!("XXHash64BE({empty})= ef46db3751d8e999")));
}

#[test]
fn test_hash_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let missing = dir.path().join("missing.mov");

    let output = mhlcheck(&["--config", &cfg, "hash", &missing.display().to_string()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hash.file_not_found"));
}

#[test]
fn test_compare_outputs() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let reference = write(&dir, "ref.txt", "MD5(a)= 01\nMD5(b)= 02\n");
    let same = write(&dir, "same.txt", "MD5(a)= 01\r\nMD5(b)= 02\r\n");
    let reordered = write(&dir, "reordered.txt", "MD5(b)= 02\nMD5(a)= 01\n");

    let output = mhlcheck(&["--config", &cfg, "compare", &reference, &same]);
    assert_eq!(output.status.code(), Some(0));

    let output = mhlcheck(&["--config", &cfg, "compare", &reference, &reordered]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED"));
}

#[test]
fn test_sequence_exit_codes() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);

    let output = mhlcheck(&["--config", &cfg, "sequence", "1-3, 7"]);
    assert_eq!(output.status.code(), Some(23));

    let output = mhlcheck(&["--config", &cfg, "sequence", "5-2"]);
    assert_eq!(output.status.code(), Some(22));

    let output = mhlcheck(&["--config", &cfg, "sequence", "01-03", "--pattern", "clip_{N}.mov"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("clip_01.mov"));
    assert!(stdout.contains("clip_03.mov"));
}

#[test]
fn test_sequence_json_reports_runs() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);

    let output = mhlcheck(&["--config", &cfg, "--json", "sequence", "0-4000000000"]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["len"], 4_000_000_001u64);
    assert_eq!(json["runs"], serde_json::json!([[0, 4_000_000_000u64]]));
    assert!(json.get("members").is_none());

    let output = mhlcheck(&["--config", &cfg, "sequence", "0-4000000000"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4000000001 files"));

    let output = mhlcheck(&[
        "--config", &cfg, "--json", "sequence", "08-10, 9", "-p", "f{N}.dpx",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["runs"], serde_json::json!([[8, 10]]));
    assert_eq!(json["names"], serde_json::json!(["f08.dpx", "f09.dpx", "f10.dpx"]));
}

#[test]
fn test_manifest_json_report() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let mhl = write(
        &dir,
        "seal.mhl",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<hashlist version="1.1">
  <hash>
    <file>file0.txt</file>
    <size>1024</size>
    <md5>91cae4eeb20d47ca70abbbf058a74e80</md5>
  </hash>
  <hash>
    <file>extra.txt</file>
    <size>1</size>
    <md5>00000000000000000000000000000000</md5>
  </hash>
</hashlist>
"#,
    );
    let expect = write(
        &dir,
        "expect.txt",
        "MD5(file0.txt)= 91cae4eeb20d47ca70abbbf058a74e80\n",
    );

    let output = mhlcheck(&["--config", &cfg, "--json", "manifest", &mhl, "--expect", &expect]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert!(json["verdicts"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["kind"] == "extra_path" && v["path"] == "extra.txt"));

    let output = mhlcheck(&[
        "--config",
        &cfg,
        "manifest",
        &mhl,
        "--expect",
        &expect,
        "--no-completeness",
    ]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_scenario_file() {
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir);
    let scenario = write(
        &dir,
        "scenario.json",
        r#"{"kind":"size_or_hash_failure","expected":"hash_mismatch","exit_code":16,
            "output":"ERROR: hash check failed for 'file0.txt'","path":"file0.txt"}"#,
    );

    let output = mhlcheck(&["--config", &cfg, "scenario", &scenario]);
    assert_eq!(output.status.code(), Some(0));
}
