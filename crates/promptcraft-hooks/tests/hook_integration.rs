//! Integration tests: run the actual hook binaries over stdin/stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use chrono::DateTime;
use serde_json::Value;

const OPTIMIZER: &str = env!("CARGO_BIN_EXE_prompt-optimizer-hook");
const METAPROMPT: &str = env!("CARGO_BIN_EXE_metaprompt-enhancer-hook");

fn workdir(config: Option<&str>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("promptcraft-hooks-it-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(dir.join(".promptcraft")).unwrap();
    if let Some(config) = config {
        std::fs::write(dir.join(".promptcraft").join("config.toml"), config).unwrap();
    }
    dir
}

fn run_hook(bin: &str, input: &str) -> Output {
    let dir = workdir(None);
    let mut child = Command::new(bin)
        .current_dir(&dir)
        .env_remove("DEBUG_PROMPT_OPTIMIZER")
        .env_remove("DEBUG_METAPROMPT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn hook");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().expect("failed to wait on hook");
    std::fs::remove_dir_all(&dir).ok();
    output
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "expected one line, got: {stdout}");
    serde_json::from_str(stdout.trim()).expect("invalid JSON output")
}

fn assert_timestamp(value: &Value) {
    let ts = value["timestamp"].as_str().expect("missing timestamp");
    assert!(DateTime::parse_from_rfc3339(ts).is_ok(), "bad timestamp {ts}");
}

#[test]
fn test_optimizer_short_prompt() {
    let output = run_hook(OPTIMIZER, r#"{"prompt": "写一篇文章"}"#);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["optimization_applied"], true);
    assert_eq!(json["original_prompt"], "写一篇文章");
    let optimized = json["optimized_prompt"].as_str().unwrap();
    assert!(optimized.starts_with("写一篇文章\n\n【优化建议】"));
    assert_timestamp(&json);
}

#[test]
fn test_optimizer_missing_prompt_is_silent() {
    let output = run_hook(OPTIMIZER, r#"{"session_id": "abc"}"#);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_optimizer_malformed_json_is_silent() {
    let output = run_hook(OPTIMIZER, "this is not json");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_metaprompt_creative() {
    let output = run_hook(METAPROMPT, r#"{"tool_input": {"prompt": "设计一个logo"}}"#);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["status"], "success");
    assert_eq!(json["analysis"]["taskType"], "creative");
    assert!(json["metaprompt_enhanced"]
        .as_str()
        .unwrap()
        .starts_with("你是一位富有创造力的创意总监"));
    assert_timestamp(&json);
}

#[test]
fn test_metaprompt_missing_prompt_is_silent() {
    let output = run_hook(METAPROMPT, "{}");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_metaprompt_malformed_json_reports_error() {
    let output = run_hook(METAPROMPT, "{\"prompt\": ");
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["status"], "error");
    assert!(json["error"].is_string());
    assert_timestamp(&json);
}

#[test]
fn test_outputs_identical_except_timestamp() {
    for bin in [OPTIMIZER, METAPROMPT] {
        let input = r#"{"prompt": "请分析数据"}"#;
        let mut a = stdout_json(&run_hook(bin, input));
        let mut b = stdout_json(&run_hook(bin, input));
        a.as_object_mut().unwrap().remove("timestamp");
        b.as_object_mut().unwrap().remove("timestamp");
        assert_eq!(a, b);
    }
}

#[test]
fn test_timeout_exits_cleanly_without_output() {
    let dir = workdir(Some("[optimizer]\ntimeout_ms = 200\n"));
    let mut child = Command::new(OPTIMIZER)
        .current_dir(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn hook");

    // Keep stdin open so end-of-stream never arrives.
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all("{\"prompt\": \"写".as_bytes()).unwrap();

    let started = Instant::now();
    let output = child.wait_with_output().expect("failed to wait on hook");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    drop(stdin);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_debug_logs_go_to_stderr_only() {
    let dir = workdir(None);
    let mut child = Command::new(OPTIMIZER)
        .current_dir(&dir)
        .env("DEBUG_PROMPT_OPTIMIZER", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn hook");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(r#"{"prompt": "写一篇文章"}"#.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(!output.stderr.is_empty());
    let json = stdout_json(&output);
    assert_eq!(json["original_prompt"], "写一篇文章");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let dir = workdir(Some("[optimizer\nbroken"));
    let mut child = Command::new(METAPROMPT)
        .current_dir(&dir)
        .env_remove("DEBUG_METAPROMPT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn hook");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(r#"{"prompt": "设计一个logo"}"#.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["status"], "success");
    assert_eq!(json["analysis"]["taskType"], "creative");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load config"), "stderr: {stderr}");

    std::fs::remove_dir_all(&dir).ok();
}
