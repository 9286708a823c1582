//! gRPC binding generation from the Helmsman IDL.
//!
//! The proto file is copied into the staging tree before protoc runs, and
//! that relocation is a load-bearing step, not an incidental layout choice:
//! the gRPC plugin derives the generated import statement from the input
//! file's path relative to the include root. Handing protoc the staged copy
//! under `-I<staging>` makes the generated file say
//! `from helmsman.proto import ...` (a relative package import); handing it
//! the original source would bake in an absolute-looking import that fails
//! at runtime. Always copy-then-generate, never generate-in-place.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::StageError;
use crate::layout::SourceLayout;
use crate::process::Cmd;

/// Relocate the canonical proto file to its staged package path.
///
/// The destination package root (the staging root) is an explicit parameter;
/// the staged path underneath it is fixed by the layout.
pub fn relocate_proto(layout: &SourceLayout, staging_root: &Path) -> Result<(), StageError> {
    let source = layout.proto_source();
    if !source.is_file() {
        return Err(StageError::MissingAsset { path: source });
    }

    let destination = layout.staged_proto(staging_root);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| StageError::io(parent, e))?;
    }
    fs::copy(&source, &destination).map_err(|e| StageError::io(&destination, e))?;
    Ok(())
}

/// Generate Python protobuf and gRPC bindings into the staging tree.
///
/// Runs `python -m grpc_tools.protoc` with the staging root as include path
/// and as both output directories, then drops an empty `__init__.py` so the
/// generated module is import-addressable as a package.
pub fn generate(
    layout: &SourceLayout,
    staging_root: &Path,
    config: &Config,
) -> Result<(), StageError> {
    relocate_proto(layout, staging_root)?;

    let staged_proto = layout.staged_proto(staging_root);
    println!("Generating gRPC bindings from {}", staged_proto.display());

    let code = Cmd::new(&config.python)
        .args(["-m", "grpc_tools.protoc"])
        .arg(format!("-I{}", staging_root.display()))
        .arg(format!("--python_out={}", staging_root.display()))
        .arg(format!("--grpc_python_out={}", staging_root.display()))
        .arg_path(&staged_proto)
        .stream()?;
    if code != 0 {
        return Err(StageError::Generation { code });
    }

    let marker = layout.staged_proto_dir(staging_root).join("__init__.py");
    fs::write(&marker, "").map_err(|e| StageError::io(&marker, e))?;
    Ok(())
}
