//! Fixed-order staging pipelines.
//!
//! The packaging lifecycle exposes named hooks; each hook resolves through a
//! registry to an ordered list of steps rather than a subclass of some fixed
//! base. A `Step` is a capability: a name, a one-line description, and a
//! `run` over the shared context. Execution is strictly sequential; the
//! first failure aborts the invocation and the typed error propagates
//! unmodified.
//!
//! Shared values live in `StepContext` and are finalized exactly once: the
//! first step to need the staging root materializes it, every later step
//! reuses that value. Nothing is recomputed per step, so steps can never
//! diverge on where the image lives.

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets;
use crate::cmake;
use crate::config::Config;
use crate::error::StageError;
use crate::layout::SourceLayout;
use crate::manifest::StageManifest;
use crate::protogen;

/// Lifecycle hook assembling the Python package image.
pub const HOOK_BUILD_PACKAGE: &str = "build-package";
/// Lifecycle hook building and staging the native extension.
pub const HOOK_BUILD_EXTENSION: &str = "build-extension";

/// One staging step, insertable into a pipeline by name.
pub trait Step {
    /// Stable name, used for registry lookup and the completion log.
    fn name(&self) -> &'static str;
    /// One-line human description.
    fn describe(&self) -> &'static str;
    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError>;
}

/// Shared state threaded through a pipeline run.
pub struct StepContext<'a> {
    pub layout: &'a SourceLayout,
    pub config: &'a Config,
    staging_root: Option<PathBuf>,
    completed: Vec<&'static str>,
}

impl<'a> StepContext<'a> {
    pub fn new(layout: &'a SourceLayout, config: &'a Config) -> Self {
        Self {
            layout,
            config,
            staging_root: None,
            completed: Vec::new(),
        }
    }

    /// Resolve the staging root, materializing the directory on first use.
    ///
    /// Later callers get the already-finalized value; the directory is
    /// guaranteed to exist before any copy happens.
    pub fn staging_root(&mut self) -> Result<&Path, StageError> {
        if self.staging_root.is_none() {
            let root = self.config.staging_dir.clone();
            fs::create_dir_all(&root).map_err(|e| StageError::io(&root, e))?;
            self.staging_root = Some(root);
        }
        // Set just above when absent.
        Ok(self.staging_root.as_deref().expect("staging root finalized"))
    }

    /// Names of steps that ran to completion, in order.
    pub fn completed(&self) -> &[&'static str] {
        &self.completed
    }

    fn mark(&mut self, name: &'static str) {
        self.completed.push(name);
    }
}

/// Ordered, named sequence of steps.
pub struct Pipeline {
    name: &'static str,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn push(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run every step in declaration order. No retries; the first error
    /// aborts and propagates as-is.
    pub fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        println!("=== {} ===", self.name);
        for step in &self.steps {
            println!("[{}] {}", step.name(), step.describe());
            step.run(ctx)?;
            ctx.mark(step.name());
        }
        Ok(())
    }
}

/// Resolve a lifecycle hook name to its pipeline.
pub fn resolve_hook(hook: &str) -> Option<Pipeline> {
    match hook {
        HOOK_BUILD_PACKAGE => Some(package_pipeline()),
        HOOK_BUILD_EXTENSION => Some(extension_pipeline()),
        _ => None,
    }
}

/// Package pipeline: GenerateBindings → StageTaskAssets → FinalizeImage.
pub fn package_pipeline() -> Pipeline {
    Pipeline::new("Package image")
        .push(Box::new(GenerateBindings))
        .push(Box::new(StageTaskAssets))
        .push(Box::new(FinalizeImage))
}

/// Extension pipeline: configure → build → stage the service binary.
pub fn extension_pipeline() -> Pipeline {
    Pipeline::new("Native extension")
        .push(Box::new(ConfigureNativeBuild))
        .push(Box::new(BuildNativeService))
        .push(Box::new(StageServiceBinary))
}

/// Full build: package steps, then extension steps, then finalize. Binding
/// generation always completes before asset staging, which completes before
/// the image is finalized.
pub fn full_pipeline() -> Pipeline {
    Pipeline::new("Full distributable")
        .push(Box::new(GenerateBindings))
        .push(Box::new(StageTaskAssets))
        .push(Box::new(ConfigureNativeBuild))
        .push(Box::new(BuildNativeService))
        .push(Box::new(StageServiceBinary))
        .push(Box::new(FinalizeImage))
}

// ============================================================================
// Step implementations
// ============================================================================

/// Generate gRPC bindings from the relocated proto file.
pub struct GenerateBindings;

impl Step for GenerateBindings {
    fn name(&self) -> &'static str {
        "generate-bindings"
    }

    fn describe(&self) -> &'static str {
        "Generate Python protobuf and gRPC bindings from helm.proto"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        let staging = ctx.staging_root()?.to_path_buf();
        protogen::generate(ctx.layout, &staging, ctx.config)
    }
}

/// Copy task asset files into the image.
pub struct StageTaskAssets;

impl Step for StageTaskAssets {
    fn name(&self) -> &'static str {
        "stage-task-assets"
    }

    fn describe(&self) -> &'static str {
        "Copy task definition files into the package image"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        let staging = ctx.staging_root()?.to_path_buf();
        assets::stage_task_assets(ctx.layout, &staging)?;
        Ok(())
    }
}

/// Run the CMake configure phase.
pub struct ConfigureNativeBuild;

impl Step for ConfigureNativeBuild {
    fn name(&self) -> &'static str {
        "configure-native-build"
    }

    fn describe(&self) -> &'static str {
        "Configure the native build tree with CMake"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        cmake::configure(ctx.layout, ctx.config)
    }
}

/// Compile the service target.
pub struct BuildNativeService;

impl Step for BuildNativeService {
    fn name(&self) -> &'static str {
        "build-native-service"
    }

    fn describe(&self) -> &'static str {
        "Build the helm_service target with CMake"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        cmake::build_service(ctx.layout, ctx.config)
    }
}

/// Copy the compiled service binary into the image.
pub struct StageServiceBinary;

impl Step for StageServiceBinary {
    fn name(&self) -> &'static str {
        "stage-service-binary"
    }

    fn describe(&self) -> &'static str {
        "Copy the compiled helm_service binary into the package image"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        let staging = ctx.staging_root()?.to_path_buf();
        assets::stage_service_binary(ctx.layout, &staging)
    }
}

/// Record the finished image for the downstream packaging step.
pub struct FinalizeImage;

impl Step for FinalizeImage {
    fn name(&self) -> &'static str {
        "finalize-image"
    }

    fn describe(&self) -> &'static str {
        "Write the stage manifest and hand off to the packaging pipeline"
    }

    fn run(&self, ctx: &mut StepContext) -> Result<(), StageError> {
        let staging = ctx.staging_root()?.to_path_buf();
        let manifest = StageManifest::collect(&staging)?;
        manifest.write(&staging)?;
        println!(
            "Image finalized: {} file(s) listed in stage manifest",
            manifest.files.len()
        );
        Ok(())
    }
}
