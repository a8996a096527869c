//! Integration tests for the crashgate CLI.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

const CONFIG: &str = r#"
[unwrap]
kinds = ["javax.servlet.ServletException"]

[duplicate]
ttl_secs = 60

[exclude]
status_codes = [404]

[redact]
query_string = ["password"]
"#;

/// Write `content` as config.toml in a fresh temp dir.
fn config_dir(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    (dir, path)
}

/// Run crashgate with stdin input and return (stdout, stderr, exit_code).
fn run_crashgate(config: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    run_crashgate_bytes(config, args, input.as_bytes())
}

/// Same as `run_crashgate`, for input that need not be UTF-8.
fn run_crashgate_bytes(config: &Path, args: &[&str], input: &[u8]) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_crashgate"))
        .arg("--config")
        .arg(config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn crashgate");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).unwrap();
    }

    let output = child.wait_with_output().expect("Failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn sent_reports(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("stdout line should be JSON"))
        .collect()
}

#[test]
fn test_plain_report_passes_through() {
    let (_dir, config) = config_dir(CONFIG);
    let input = r#"{"error":{"kind":"java.lang.IllegalStateException","message":"boom"}}"#;
    let (stdout, stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let sent = sent_reports(&stdout);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["error"]["kind"], "java.lang.IllegalStateException");
    assert!(stderr.contains("delivered 1"), "stderr: {}", stderr);
}

#[test]
fn test_wrapper_is_unwrapped() {
    let (_dir, config) = config_dir(CONFIG);
    let input = r#"{"error":{"kind":"javax.servlet.ServletException","message":"wrapper","innerError":{"kind":"java.sql.SQLException","message":"deadlock"}}}"#;
    let (stdout, _stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_eq!(exit_code, 0);
    let sent = sent_reports(&stdout);
    assert_eq!(sent[0]["error"]["kind"], "java.sql.SQLException");
    assert!(sent[0]["error"].get("innerError").is_none());
}

#[test]
fn test_duplicate_is_suppressed() {
    let (_dir, config) = config_dir(CONFIG);
    let line = r#"{"error":{"kind":"java.lang.IllegalStateException","message":"boom"}}"#;
    let input = format!("{}\n{}\n", line, line);
    let (stdout, stderr, exit_code) = run_crashgate(&config, &["run"], &input);

    assert_eq!(exit_code, 0);
    assert_eq!(sent_reports(&stdout).len(), 1);
    assert!(stderr.contains("cancelled 1"), "stderr: {}", stderr);
}

#[test]
fn test_excluded_status_is_dropped() {
    let (_dir, config) = config_dir(CONFIG);
    let input = r#"{"error":{"kind":"E","message":"missing"},"response":{"statusCode":404}}"#;
    let (stdout, _stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_eq!(exit_code, 0);
    assert!(stdout.is_empty(), "stdout: {}", stdout);
}

#[test]
fn test_query_string_is_redacted() {
    let (_dir, config) = config_dir(CONFIG);
    let input = r#"{"error":{"kind":"E","message":"m"},"request":{"hostName":"shop.example.com","queryString":{"password":"secret","page":"2"}}}"#;
    let (stdout, _stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_eq!(exit_code, 0);
    let sent = sent_reports(&stdout);
    assert_eq!(sent[0]["request"]["queryString"]["password"], "[FILTERED]");
    assert_eq!(sent[0]["request"]["queryString"]["page"], "2");
}

#[test]
fn test_malformed_line_is_skipped() {
    let (_dir, config) = config_dir(CONFIG);
    let input = "{not json}\n{\"error\":{\"kind\":\"E\",\"message\":\"ok\"}}\n";
    let (stdout, stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_eq!(exit_code, 0);
    assert_eq!(sent_reports(&stdout).len(), 1);
    assert!(stderr.contains("malformed 1"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    let (_dir, config) = config_dir(CONFIG);
    let mut input = b"\xff\xfe garbage\n".to_vec();
    input.extend_from_slice(br#"{"error":{"kind":"E","message":"after"}}"#);
    let (stdout, stderr, exit_code) = run_crashgate_bytes(&config, &["run"], &input);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let sent = sent_reports(&stdout);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["error"]["message"], "after");
    assert!(stderr.contains("malformed 1"), "stderr: {}", stderr);
}

#[test]
fn test_quiet_suppresses_summary() {
    let (_dir, config) = config_dir(CONFIG);
    let input = r#"{"error":{"kind":"E","message":"m"}}"#;
    let (_stdout, stderr, exit_code) = run_crashgate(&config, &["--quiet", "run"], input);

    assert_eq!(exit_code, 0);
    assert!(stderr.is_empty(), "stderr: {}", stderr);
}

#[test]
fn test_request_scoped_without_request_fails() {
    let (_dir, config) = config_dir("request_scoped = true\n");
    let input = r#"{"error":{"kind":"E","message":"m"}}"#;
    let (stdout, stderr, exit_code) = run_crashgate(&config, &["run"], input);

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("request-scoped"), "stderr: {}", stderr);
}

#[test]
fn test_check_lists_chains() {
    let (_dir, config) = config_dir(CONFIG);
    let (_stdout, stderr, exit_code) = run_crashgate(&config, &["check"], "");

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("Configuration is valid."));
    assert!(
        stderr.contains(
            "before-send: strip-wrapped-error -> http-status -> redact-query-string -> duplicate-error"
        ),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("after-send: duplicate-error"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_dir, config) = config_dir("[duplicate]\nttl_secs = 0\n");
    let (_stdout, stderr, exit_code) = run_crashgate(&config, &["check"], "");

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("ttl_secs"), "stderr: {}", stderr);
}

#[test]
fn test_init_command_creates_config() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("crashgate.toml");

    let output = Command::new(env!("CARGO_BIN_EXE_crashgate"))
        .arg("--config")
        .arg(&config_path)
        .arg("init")
        .arg("--path")
        .arg(&config_path)
        .output()
        .expect("Failed to run init command");

    assert!(output.status.success(), "init command should succeed");
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[duplicate]"));
    assert!(content.contains("[redact]"));
}

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_crashgate"))
        .arg("--help")
        .output()
        .expect("Failed to run help command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Help should succeed");
    assert!(stdout.contains("crashgate"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("init"));
}

#[test]
fn test_version_command() {
    let (_dir, config) = config_dir("");
    let (stdout, _stderr, exit_code) = run_crashgate(&config, &["version"], "");

    assert_eq!(exit_code, 0);
    assert!(stdout.contains(&format!("crashgate {}", env!("CARGO_PKG_VERSION"))));
}
