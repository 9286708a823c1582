//! Helmpack - packaging orchestrator for the Helmsman distributable.
//!
//! Assembles the Python package image for the native Helmsman control
//! service: generates gRPC bindings from the IDL, stages task assets,
//! drives the CMake build of the service binary and copies it into the
//! image consumed by the downstream packaging pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use helmpack::commands;
use helmpack::config::Config;

#[derive(Parser)]
#[command(name = "helmpack")]
#[command(about = "Helmsman packaging orchestrator")]
#[command(
    after_help = "QUICK START:\n  helmpack preflight  Check toolchain and source tree\n  helmpack build      Build the full distributable image\n  helmpack show config  Show resolved configuration\n  helmpack clean      Remove staged artifacts"
)]
struct Cli {
    /// Packaging directory (defaults to this crate's own location).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the distributable image (bindings, assets, native service)
    Build {
        #[command(subcommand)]
        target: Option<BuildTarget>,
    },

    /// Clean staged and built artifacts (default: staging tree only)
    Clean {
        #[command(subcommand)]
        what: Option<CleanTarget>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Run preflight checks (verify toolchain before build)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum BuildTarget {
    /// Build only the package image (bindings + task assets + manifest)
    Package,
    /// Generate only the gRPC bindings
    Bindings,
    /// Stage only the task assets
    Assets,
    /// Build and stage only the native extension
    Extension,
}

#[derive(Subcommand)]
enum CleanTarget {
    /// Remove the staging tree
    Staging,
    /// Remove the CMake build directory
    Build,
    /// Remove everything
    All,
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show staged image contents
    Image,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = cli
        .root
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    // Load .env if present
    dotenvy::dotenv().ok();

    // The only environment read outside Config: ARCHFLAGS, consulted on
    // macOS only and threaded through the configuration from here on.
    let arch_flags = if cfg!(target_os = "macos") {
        std::env::var("ARCHFLAGS").ok()
    } else {
        None
    };
    let config = Config::load(&base_dir, arch_flags);

    match cli.command {
        Commands::Build { target } => {
            let build_target = match target {
                None => commands::build::BuildTarget::Full,
                Some(BuildTarget::Package) => commands::build::BuildTarget::Package,
                Some(BuildTarget::Bindings) => commands::build::BuildTarget::Bindings,
                Some(BuildTarget::Assets) => commands::build::BuildTarget::Assets,
                Some(BuildTarget::Extension) => commands::build::BuildTarget::Extension,
            };
            commands::cmd_build(&base_dir, build_target, &config)?;
        }

        Commands::Clean { what } => {
            let clean_target = match what {
                None | Some(CleanTarget::Staging) => commands::clean::CleanTarget::Staging,
                Some(CleanTarget::Build) => commands::clean::CleanTarget::Build,
                Some(CleanTarget::All) => commands::clean::CleanTarget::All,
            };
            commands::cmd_clean(&base_dir, clean_target, &config)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Image => commands::show::ShowTarget::Image,
            };
            commands::cmd_show(&base_dir, show_target, &config)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&base_dir, strict, &config)?;
        }
    }

    Ok(())
}
