//! Shared test utilities for helmpack tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use helmpack::config::Config;
use helmpack::layout::SourceLayout;

/// Test environment with a mock Helmsman source tree.
///
/// Layout mirrors the real repository:
/// ```text
/// <tmp>/repo/
///   CMakeLists.txt
///   rpc/helm.proto
///   core/tasks/...
///   build/bin/helm_service   (only after with_built_artifact)
///   packaging/               (orchestrator base dir)
/// ```
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Repository root (native build root)
    pub repo: PathBuf,
    /// Packaging directory (orchestrator location)
    pub packaging: PathBuf,
    /// Directory holding stub tool scripts and their argv logs
    pub bin: PathBuf,
}

impl TestEnv {
    /// Create a mock source tree with a proto file and two task assets.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = temp_dir.path().join("repo");
        let packaging = repo.join("packaging");
        let bin = temp_dir.path().join("bin");

        fs::create_dir_all(&packaging).expect("Failed to create packaging dir");
        fs::create_dir_all(&bin).expect("Failed to create stub bin dir");
        fs::write(repo.join("CMakeLists.txt"), "project(helmsman)\n").unwrap();

        fs::create_dir_all(repo.join("rpc")).unwrap();
        fs::write(
            repo.join("rpc/helm.proto"),
            "syntax = \"proto3\";\npackage helmsman;\n",
        )
        .unwrap();

        let tasks = repo.join("core/tasks");
        fs::create_dir_all(tasks.join("walk")).unwrap();
        fs::write(tasks.join("walk/walk.xml"), "<task name=\"walk\"/>\n").unwrap();
        fs::write(tasks.join("stand.xml"), "<task name=\"stand\"/>\n").unwrap();

        Self {
            _temp_dir: temp_dir,
            repo,
            packaging,
            bin,
        }
    }

    /// Source layout rooted at the mock packaging dir.
    pub fn layout(&self) -> SourceLayout {
        SourceLayout::new(&self.packaging)
    }

    /// Configuration pointing staging into the mock tree, with real tool
    /// names. Tests that spawn tools swap in stubs.
    pub fn config(&self) -> Config {
        Config {
            staging_dir: self.packaging.join("dist/staging"),
            build_config: "Debug".to_string(),
            cmake: "cmake".to_string(),
            python: "python3".to_string(),
            arch_flags: None,
        }
    }

    /// Staging root used by `config()`.
    pub fn staging(&self) -> PathBuf {
        self.packaging.join("dist/staging")
    }

    /// Place a compiled service binary where the CMake build would.
    pub fn with_built_artifact(&self, content: &[u8]) -> PathBuf {
        let artifact = self.repo.join("build/bin/helm_service");
        fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        fs::write(&artifact, content).unwrap();
        fs::set_permissions(&artifact, fs::Permissions::from_mode(0o755)).unwrap();
        artifact
    }

    /// Create an executable stub tool that appends its argv (one per line,
    /// with a blank separator per invocation) to a log file and exits with
    /// `exit_code`. Returns (stub path, log path).
    pub fn stub_tool(&self, name: &str, exit_code: i32) -> (PathBuf, PathBuf) {
        let stub = self.bin.join(name);
        let log = self.bin.join(format!("{name}.log"));
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" >> {}\nprintf -- '--\\n' >> {}\nexit {}\n",
            log.display(),
            log.display(),
            exit_code
        );
        fs::write(&stub, script).unwrap();
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
        (stub, log)
    }

    /// Argv lines of every recorded invocation of a stub tool.
    pub fn logged_args(&self, log: &Path) -> Vec<Vec<String>> {
        let content = fs::read_to_string(log).unwrap_or_default();
        content
            .split("--\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| chunk.lines().map(str::to_string).collect())
            .collect()
    }
}

/// Assert a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.is_file(), "expected file at {}", path.display());
}

/// Assert two files have identical bytes.
pub fn assert_same_bytes(a: &Path, b: &Path) {
    let left = fs::read(a).unwrap_or_else(|_| panic!("cannot read {}", a.display()));
    let right = fs::read(b).unwrap_or_else(|_| panic!("cannot read {}", b.display()));
    assert_eq!(
        left,
        right,
        "content mismatch between {} and {}",
        a.display(),
        b.display()
    );
}

/// Collect all file paths under a root, relative and sorted.
pub fn tree_listing(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if !root.exists() {
        return files;
    }
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            files.push(
                entry
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned(),
            );
        }
    }
    files.sort();
    files
}
