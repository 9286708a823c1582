//! Preflight checks for the Helmsman packaging toolchain.
//!
//! Validates external tools and source-tree roots before a build is
//! attempted. Run with `helmpack preflight`.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::layout::SourceLayout;
use crate::process::{self, Cmd};

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check failed - build will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: None,
        }
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    /// Count of failed checks.
    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let status_str = match check.status {
                CheckStatus::Pass => "PASS",
                CheckStatus::Fail => "FAIL",
                CheckStatus::Warn => "WARN",
            };
            print!("  [{}] {}", status_str, check.name);
            if let Some(details) = &check.details {
                println!(": {}", details);
            } else {
                println!();
            }
        }

        println!();
        let passed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        println!("Summary: {}/{} passed", passed, self.checks.len());
        if self.fail_count() > 0 {
            println!(
                "         {} FAILED - build will not succeed",
                self.fail_count()
            );
        }
    }
}

/// Run all preflight checks.
pub fn run_preflight(layout: &SourceLayout, config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    println!("Checking external tools...");
    checks.push(check_tool(
        &config.cmake,
        "Required to build the native service",
    ));
    checks.push(check_tool(
        &config.python,
        "Required to run grpc_tools.protoc",
    ));
    checks.push(check_grpc_tools(config));

    println!("Checking source tree...");
    checks.push(check_path(
        "CMake source root",
        &layout.native_root().join("CMakeLists.txt"),
    ));
    checks.push(check_path("IDL source", &layout.proto_source()));
    checks.push(check_path("Task asset tree", &layout.tasks_root()));

    println!();
    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(layout: &SourceLayout, config: &Config) -> Result<()> {
    let report = run_preflight(layout, config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before building.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}

fn check_tool(tool: &str, purpose: &str) -> CheckResult {
    match process::find_tool(tool) {
        Some(path) => CheckResult::pass_with(tool, &path.to_string_lossy()),
        None => CheckResult::fail(tool, &format!("Not found in PATH. {}", purpose)),
    }
}

/// grpc_tools must be importable by the configured interpreter, not merely
/// installed somewhere on the machine.
fn check_grpc_tools(config: &Config) -> CheckResult {
    let result = Cmd::new(&config.python)
        .args(["-c", "import grpc_tools.protoc"])
        .run();
    match result {
        Ok(r) if r.success() => CheckResult::pass("grpc_tools.protoc"),
        Ok(_) => CheckResult::fail(
            "grpc_tools.protoc",
            "Not importable. Install with: pip install grpcio-tools",
        ),
        Err(_) => CheckResult::warn(
            "grpc_tools.protoc",
            "Could not probe (python interpreter missing)",
        ),
    }
}

fn check_path(name: &str, path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::pass_with(name, &path.to_string_lossy())
    } else {
        CheckResult::fail(name, &format!("Not found at {}", path.display()))
    }
}
