//! Error taxonomy for the staging pipeline.
//!
//! Every variant maps to a missing prerequisite or a broken external
//! toolchain, never a transient condition. Errors abort the invocation and
//! propagate unmodified to main; nothing here is caught or retried
//! in-process. External tool output streams to the terminal before the
//! orchestrator's own message, so variants carry exit codes, not captured
//! output.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a staging step or one of the external tools it drives.
#[derive(Debug, Error)]
pub enum StageError {
    /// CMake configure phase exited non-zero.
    #[error("cmake configure failed (exit code {code}); see cmake output above")]
    Configuration { code: i32 },

    /// CMake build phase exited non-zero for the named target.
    #[error("cmake build of target '{target}' failed (exit code {code}); see cmake output above")]
    BuildFailure { target: String, code: i32 },

    /// The protoc binding generator exited non-zero.
    #[error("binding generation failed (exit code {code}); see protoc output above")]
    Generation { code: i32 },

    /// The prebuilt native service binary is absent from the build tree.
    #[error(
        "cannot find `{artifact}` binary at {}.\n\
         The native service must be compiled before it can be staged.\n\
         Run `helmpack build extension` first.",
        path.display()
    )]
    MissingArtifact { artifact: String, path: PathBuf },

    /// A declared source (asset tree or IDL file) does not exist where the
    /// source layout says it should.
    #[error(
        "required source missing at {}; the source tree is misconfigured or incomplete",
        path.display()
    )]
    MissingAsset { path: PathBuf },

    /// An external tool could not be spawned at all.
    #[error("failed to execute '{program}': {source}. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem fault while manipulating the staging tree.
    #[error("staging filesystem operation failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stage manifest could not be encoded or decoded.
    #[error("stage manifest is invalid: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl StageError {
    /// Attach a path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
