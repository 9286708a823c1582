//! Preflight command - runs preflight checks.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::layout::SourceLayout;
use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(base_dir: &Path, strict: bool, config: &Config) -> Result<()> {
    let layout = SourceLayout::new(base_dir);
    if strict {
        preflight::run_preflight_or_fail(&layout, config)?;
    } else {
        let report = preflight::run_preflight(&layout, config);
        report.print();
        if !report.all_passed() {
            println!("Some checks failed. Use --strict to fail the build.");
        }
    }
    Ok(())
}
