// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::process::{Command, Stdio};

/// Run the ratt-gff binary with the given arguments and collect its output.
pub fn run_ratt_gff(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ratt-gff"))
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to start ratt-gff");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}
