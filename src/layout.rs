//! Path resolution across the multi-root Helmsman source tree.
//!
//! The packaging orchestrator lives in `<repo>/packaging`; everything it
//! touches is addressed by a fixed relative offset from that directory. All
//! functions here are pure path arithmetic: no filesystem access, no
//! mutation, idempotent.

use std::path::{Path, PathBuf};

/// Python package staged into the image root.
pub const PACKAGE: &str = "helmsman";

/// Subpackage holding the native service binary and its task data.
pub const NATIVE_SUBPACKAGE: &str = "core";

/// IDL file describing the gRPC service contract.
pub const PROTO_FILE: &str = "helm.proto";

/// CMake target name and, identically, the compiled artifact's file name.
pub const SERVICE_TARGET: &str = "helm_service";

/// Extension of task definition files staged alongside the binary.
pub const TASK_EXTENSION: &str = "xml";

/// Resolved roots of the Helmsman source tree.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    packaging_dir: PathBuf,
    native_root: PathBuf,
}

impl SourceLayout {
    /// Build a layout rooted at the orchestrator's own directory.
    pub fn new(packaging_dir: &Path) -> Self {
        let native_root = packaging_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| packaging_dir.join(".."));
        Self {
            packaging_dir: packaging_dir.to_path_buf(),
            native_root,
        }
    }

    /// Directory the orchestrator runs from (`<repo>/packaging`).
    pub fn packaging_dir(&self) -> &Path {
        &self.packaging_dir
    }

    /// Repository root, which is also the CMake source root.
    pub fn native_root(&self) -> &Path {
        &self.native_root
    }

    /// Out-of-source CMake build directory.
    pub fn build_dir(&self) -> PathBuf {
        self.native_root.join("build")
    }

    /// Compiled service binary produced by the CMake build.
    pub fn built_artifact(&self) -> PathBuf {
        self.build_dir().join("bin").join(SERVICE_TARGET)
    }

    /// Canonical IDL source file.
    pub fn proto_source(&self) -> PathBuf {
        self.native_root.join("rpc").join(PROTO_FILE)
    }

    /// Root of the task asset tree scanned for `*.xml` files.
    pub fn tasks_root(&self) -> PathBuf {
        self.native_root.join(NATIVE_SUBPACKAGE).join("tasks")
    }

    // Staged-image paths. The staging root is owned by the packaging
    // lifecycle and only known at execution time, so it is a parameter
    // rather than a field.

    /// `<staging>/helmsman/proto`, the relocated proto package.
    pub fn staged_proto_dir(&self, staging_root: &Path) -> PathBuf {
        staging_root.join(PACKAGE).join("proto")
    }

    /// `<staging>/helmsman/proto/helm.proto`.
    pub fn staged_proto(&self, staging_root: &Path) -> PathBuf {
        self.staged_proto_dir(staging_root).join(PROTO_FILE)
    }

    /// `<staging>/helmsman/core`.
    pub fn staged_native_dir(&self, staging_root: &Path) -> PathBuf {
        staging_root.join(PACKAGE).join(NATIVE_SUBPACKAGE)
    }

    /// `<staging>/helmsman/core/helm_service`.
    pub fn staged_artifact(&self, staging_root: &Path) -> PathBuf {
        self.staged_native_dir(staging_root).join(SERVICE_TARGET)
    }

    /// `<staging>/helmsman/core/tasks`.
    pub fn staged_tasks_dir(&self, staging_root: &Path) -> PathBuf {
        self.staged_native_dir(staging_root).join("tasks")
    }
}
