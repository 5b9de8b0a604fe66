// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Path of the binary built for this test run
pub fn reqtrace_binary() -> &'static str {
    env!("CARGO_BIN_EXE_reqtrace")
}

/// Run reqtrace with the given arguments, ignoring any config file on the machine
pub fn run_reqtrace(args: &[&str]) -> (String, String, i32) {
    let mut full_args = vec!["--ignore-config"];
    full_args.extend_from_slice(args);
    run_reqtrace_raw(&full_args)
}

/// Run reqtrace exactly as given, config-file lookup included
pub fn run_reqtrace_raw(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(reqtrace_binary())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to run reqtrace");
    split_output(output)
}

pub fn split_output(output: Output) -> (String, String, i32) {
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write `files` (relative name, content) below `root`, creating parent directories
pub fn write_log_tree(root: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }
            fs::write(&path, content).expect("Failed to write log file");
            path
        })
        .collect()
}

/// One well-formed log line
pub fn log_line(ts: &str, level: &str, service: &str, message: &str, request_id: &str) -> String {
    format!(
        "{} [{}] {}: {}, request_id={}, user_id=u1",
        ts, level, service, message, request_id
    )
}

pub fn parse_report(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("Report should be valid JSON")
}
