//! Build command - runs the staging pipelines.

use anyhow::Result;
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::layout::SourceLayout;
use crate::manifest::MANIFEST_NAME;
use crate::pipeline::{self, StepContext};

/// Build target for the build command.
pub enum BuildTarget {
    /// Full distributable: bindings, assets, native extension, manifest.
    Full,
    /// Package image only (bindings + assets + manifest).
    Package,
    /// gRPC bindings only.
    Bindings,
    /// Task assets only.
    Assets,
    /// Native extension only (configure + build + stage binary).
    Extension,
}

/// Execute the build command.
pub fn cmd_build(base_dir: &Path, target: BuildTarget, config: &Config) -> Result<()> {
    let layout = SourceLayout::new(base_dir);
    let start = Instant::now();

    let pipeline = match &target {
        BuildTarget::Full => pipeline::full_pipeline(),
        BuildTarget::Package => pipeline::package_pipeline(),
        BuildTarget::Bindings => pipeline::Pipeline::new("Bindings")
            .push(Box::new(pipeline::GenerateBindings)),
        BuildTarget::Assets => pipeline::Pipeline::new("Task assets")
            .push(Box::new(pipeline::StageTaskAssets)),
        BuildTarget::Extension => pipeline::extension_pipeline(),
    };

    let mut ctx = StepContext::new(&layout, config);
    pipeline.run(&mut ctx)?;

    let elapsed = start.elapsed().as_secs_f64();
    if elapsed >= 60.0 {
        println!("\n=== Build Complete ({:.1}m) ===", elapsed / 60.0);
    } else {
        println!("\n=== Build Complete ({:.1}s) ===", elapsed);
    }
    println!("  Staging root: {}", config.staging_dir.display());
    if matches!(target, BuildTarget::Full | BuildTarget::Package) {
        println!("  Manifest: {}", config.staging_dir.join(MANIFEST_NAME).display());
    }

    Ok(())
}
