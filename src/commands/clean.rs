//! Clean command - removes staged and built artifacts.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::layout::SourceLayout;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Remove the staging tree only (default).
    Staging,
    /// Remove the CMake build directory only.
    Build,
    /// Remove both.
    All,
}

/// Execute the clean command.
pub fn cmd_clean(base_dir: &Path, target: CleanTarget, config: &Config) -> Result<()> {
    let layout = SourceLayout::new(base_dir);

    match target {
        CleanTarget::Staging => remove_tree(&config.staging_dir)?,
        CleanTarget::Build => remove_tree(&layout.build_dir())?,
        CleanTarget::All => {
            remove_tree(&config.staging_dir)?;
            remove_tree(&layout.build_dir())?;
        }
    }
    Ok(())
}

fn remove_tree(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Removing {}...", path.display());
        fs::remove_dir_all(path)?;
    } else {
        println!("[SKIP] {} does not exist", path.display());
    }
    Ok(())
}
