//! Show command - displays information.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::layout::SourceLayout;
use crate::manifest::StageManifest;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration and resolved source-tree paths.
    Config,
    /// Show the staged image contents from the manifest.
    Image,
}

/// Execute the show command.
pub fn cmd_show(base_dir: &Path, target: ShowTarget, config: &Config) -> Result<()> {
    let layout = SourceLayout::new(base_dir);

    match target {
        ShowTarget::Config => {
            config.print();
            println!();
            println!("Source tree:");
            println!("  native root: {}", layout.native_root().display());
            println!("  build dir:   {}", layout.build_dir().display());
            println!("  IDL source:  {}", layout.proto_source().display());
            println!("  task assets: {}", layout.tasks_root().display());
        }
        ShowTarget::Image => {
            if !config.staging_dir.exists() {
                anyhow::bail!(
                    "Staging tree not found at {}. Run 'helmpack build' first.",
                    config.staging_dir.display()
                );
            }
            let manifest = StageManifest::load(&config.staging_dir)?;
            println!("Package: {}", manifest.package);
            println!("Staged files ({}):", manifest.files.len());
            for file in &manifest.files {
                println!("  {}", file);
            }
        }
    }
    Ok(())
}
