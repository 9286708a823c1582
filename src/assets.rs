//! Staging of auxiliary files into the package image.
//!
//! One algorithm, two instantiations: the task asset tree (recursive,
//! extension-filtered) and the compiled service binary (a single named
//! file with a hard existence precondition). Both derive an ordered
//! manifest first, then copy with parent creation, preserving file mode
//! where the platform supports it.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::StageError;
use crate::layout::{SourceLayout, SERVICE_TARGET, TASK_EXTENSION};

/// One planned copy: absolute source, destination relative to the copy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub source: PathBuf,
    pub dest_rel: PathBuf,
}

/// Ordered set of planned copies. Read-only after derivation.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    entries: Vec<AssetEntry>,
}

impl AssetManifest {
    /// Derive a manifest by recursively scanning `root` for files with the
    /// given extension. Destination paths are relative to `root`.
    ///
    /// A missing or non-directory root is a misconfigured source tree and
    /// fails with `MissingAsset`. An existing root that simply matches
    /// nothing yields an empty manifest; callers decide how loudly to
    /// report that.
    pub fn scan(root: &Path, extension: &str) -> Result<Self, StageError> {
        if !root.is_dir() {
            return Err(StageError::MissingAsset {
                path: root.to_path_buf(),
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                StageError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            // Walk is rooted at `root`, so strip_prefix cannot fail.
            let dest_rel = entry
                .path()
                .strip_prefix(root)
                .expect("walked path outside scan root")
                .to_path_buf();
            entries.push(AssetEntry {
                source: entry.path().to_path_buf(),
                dest_rel,
            });
        }
        entries.sort_by(|a, b| a.dest_rel.cmp(&b.dest_rel));
        Ok(Self { entries })
    }

    /// Manifest holding a single named file.
    pub fn single(source: PathBuf, dest_rel: PathBuf) -> Self {
        Self {
            entries: vec![AssetEntry { source, dest_rel }],
        }
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Copy every manifest entry under `dest_root`, creating parent directories
/// first. `fs::copy` preserves the source file mode on Unix.
pub fn stage(manifest: &AssetManifest, dest_root: &Path) -> Result<usize, StageError> {
    for entry in manifest.entries() {
        let destination = dest_root.join(&entry.dest_rel);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| StageError::io(parent, e))?;
        }
        fs::copy(&entry.source, &destination).map_err(|e| StageError::io(&destination, e))?;
    }
    Ok(manifest.len())
}

/// Stage the task asset tree into `<staging>/helmsman/core/tasks`.
///
/// Returns the number of files staged. Zero matches is legal (a tree with
/// no task definitions yet) but reported, so it cannot be confused with a
/// misconfigured root, which fails instead.
pub fn stage_task_assets(layout: &SourceLayout, staging_root: &Path) -> Result<usize, StageError> {
    let tasks_root = layout.tasks_root();
    let manifest = AssetManifest::scan(&tasks_root, TASK_EXTENSION)?;

    if manifest.is_empty() {
        println!(
            "[WARN] No .{TASK_EXTENSION} task assets found under {}",
            tasks_root.display()
        );
        return Ok(0);
    }

    let dest = layout.staged_tasks_dir(staging_root);
    println!(
        "Copying {} task asset(s) from {} to {}",
        manifest.len(),
        tasks_root.display(),
        dest.display()
    );
    stage(&manifest, &dest)
}

/// Stage the compiled service binary into `<staging>/helmsman/core`.
///
/// The binary is a hard precondition: packaging without it would silently
/// ship a broken install, so a missing artifact fails before any copy.
pub fn stage_service_binary(layout: &SourceLayout, staging_root: &Path) -> Result<(), StageError> {
    let artifact = layout.built_artifact();
    if !artifact.is_file() {
        return Err(StageError::MissingArtifact {
            artifact: SERVICE_TARGET.to_string(),
            path: artifact,
        });
    }

    let manifest = AssetManifest::single(artifact.clone(), PathBuf::from(SERVICE_TARGET));
    let dest = layout.staged_native_dir(staging_root);
    println!(
        "Copying service binary {} to {}",
        artifact.display(),
        dest.display()
    );
    stage(&manifest, &dest)?;
    Ok(())
}
