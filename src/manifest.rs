//! Stage manifest: a JSON record of everything in the package image.
//!
//! Written at the end of a full build for the downstream packaging pipeline,
//! and doubles as the idempotency witness: two invocations over the same
//! sources produce byte-identical manifests.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::StageError;
use crate::layout::PACKAGE;

/// File name of the manifest inside the staging root.
pub const MANIFEST_NAME: &str = "stage-manifest.json";

/// Sorted listing of the staged package image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageManifest {
    /// Python package the image ships.
    pub package: String,
    /// Staging-root-relative paths, sorted, `/`-separated.
    pub files: Vec<String>,
}

impl StageManifest {
    /// Collect the manifest by walking the staging tree.
    ///
    /// The manifest file itself is excluded so that collect-write-collect is
    /// a fixed point.
    pub fn collect(staging_root: &Path) -> Result<Self, StageError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(staging_root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(staging_root).to_path_buf();
                StageError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(staging_root)
                .expect("walked path outside staging root");
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if rel == MANIFEST_NAME {
                continue;
            }
            files.push(rel);
        }
        files.sort();
        Ok(Self {
            package: PACKAGE.to_string(),
            files,
        })
    }

    /// Write the manifest into the staging root.
    pub fn write(&self, staging_root: &Path) -> Result<(), StageError> {
        let path = staging_root.join(MANIFEST_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| StageError::io(&path, e))?;
        Ok(())
    }

    /// Load a previously written manifest.
    pub fn load(staging_root: &Path) -> Result<Self, StageError> {
        let path = staging_root.join(MANIFEST_NAME);
        let json = fs::read_to_string(&path).map_err(|e| StageError::io(&path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}
