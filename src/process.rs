//! Subprocess invocation for the external toolchain.
//!
//! Two modes: `run` captures output for short queries (preflight probes),
//! `stream` inherits stdio so the external tool's diagnostics reach the
//! terminal verbatim, ahead of any error the orchestrator raises afterwards.
//! Exit status interpretation is left to the caller; only a failure to spawn
//! is an error here.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::StageError;

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code, or -1 if terminated by signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Builder for a single external command invocation.
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Set the working directory.
    pub fn dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Run the command and capture its output.
    pub fn run(self) -> Result<CommandResult, StageError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| StageError::Spawn {
            program: self.program,
            source,
        })?;

        Ok(CommandResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run the command with inherited stdio and return its exit code.
    ///
    /// Output goes directly to the terminal. Use for long-running tools
    /// (cmake, protoc) whose diagnostics the user must see unfiltered.
    pub fn stream(self) -> Result<i32, StageError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| StageError::Spawn {
            program: self.program,
            source,
        })?;

        Ok(status.code().unwrap_or(-1))
    }
}

/// Locate a program in PATH. Returns its full path if found.
pub fn find_tool(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
