//! Operator-facing output: progress lines, the fatal-error banner and the
//! process exit codes.

use std::process;

/// Prefix identifying this tool in progress and error output.
pub const TOOL_TAG: &str = "<ratt-gff>";

const BANNER_RULE_WIDTH: usize = 83;

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Progress line on stdout, visually separated from tool output above it.
pub fn progress(message: &str) {
    println!("\n{} {}", TOOL_TAG, message);
}

/// The bracketed banner printed for a fatal collaborator failure.
pub fn fatal_banner(message: &str) -> String {
    let rule = "*".repeat(BANNER_RULE_WIDTH);
    format!("{}\n{} FATAL-ERROR\n{}\n{}", rule, TOOL_TAG, message, rule)
}

/// The bracketed banner for a non-fatal failure the run continues past.
pub fn warning_banner(message: &str) -> String {
    let rule = "*".repeat(BANNER_RULE_WIDTH);
    format!("{}\n{} ERROR\n{}\n{}", rule, TOOL_TAG, message, rule)
}
