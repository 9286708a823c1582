//! CMake driver for the native service build.
//!
//! Two phases, both blocking, both judged solely by exit status: configure
//! the source tree into an out-of-source build directory, then build exactly
//! one target with available-core-count parallelism. CMake's own output
//! streams to the terminal; on failure the typed error carries only the exit
//! code. No state persists between calls beyond CMake's own cache.

use std::path::Path;

use crate::config::Config;
use crate::error::StageError;
use crate::layout::{SourceLayout, SERVICE_TARGET};
use crate::process::Cmd;

/// Fixed configure options, independent of platform.
const BASE_CONFIGURE_ARGS: &[&str] = &[
    "-DCMAKE_EXPORT_COMPILE_COMMANDS:BOOL=TRUE",
    "-DBUILD_TESTING:BOOL=OFF",
];

/// Translate a raw architecture flag string into the value of CMake's
/// `CMAKE_OSX_ARCHITECTURES` option.
///
/// The string is scanned for the two recognized tokens `-arch x86_64` and
/// `-arch arm64`; matches are joined with `;` in order of appearance.
/// Unrecognized tokens are ignored. Returns None when nothing matched.
pub fn osx_architectures(arch_flags: &str) -> Option<String> {
    let mut archs: Vec<(usize, &str)> = Vec::new();
    for arch in ["x86_64", "arm64"] {
        let token = format!("-arch {arch}");
        if let Some(pos) = arch_flags.find(&token) {
            archs.push((pos, arch));
        }
    }
    if archs.is_empty() {
        return None;
    }
    archs.sort_by_key(|(pos, _)| *pos);
    Some(
        archs
            .iter()
            .map(|(_, arch)| *arch)
            .collect::<Vec<_>>()
            .join(";"),
    )
}

/// Assemble the full configure argument list.
///
/// Split out from `configure` so tests can inspect the arguments without
/// spawning CMake.
pub fn configure_args(layout: &SourceLayout, config: &Config) -> Vec<String> {
    let mut args: Vec<String> = BASE_CONFIGURE_ARGS.iter().map(|s| s.to_string()).collect();
    args.insert(
        1,
        format!("-DCMAKE_BUILD_TYPE:STRING={}", config.build_config),
    );
    if let Some(flags) = config.arch_flags.as_deref() {
        if let Some(archs) = osx_architectures(flags) {
            args.push(format!("-DCMAKE_OSX_ARCHITECTURES={archs}"));
        }
    }
    args.push(format!("-S{}", layout.native_root().display()));
    args.push(format!("-B{}", layout.build_dir().display()));
    args
}

/// Run the CMake configure phase for the native source tree.
pub fn configure(layout: &SourceLayout, config: &Config) -> Result<(), StageError> {
    let args = configure_args(layout, config);

    println!("Configuring CMake with the following arguments:");
    for arg in &args {
        println!("  {arg}");
    }

    let code = Cmd::new(&config.cmake)
        .args(&args)
        .dir(layout.native_root())
        .stream()?;
    if code != 0 {
        return Err(StageError::Configuration { code });
    }
    Ok(())
}

/// Run the CMake build phase for one named target.
pub fn build_target(
    layout: &SourceLayout,
    config: &Config,
    target: &str,
) -> Result<(), StageError> {
    let jobs = num_cpus::get();
    println!("Building `{target}` with CMake (-j{jobs}, {})", config.build_config);

    let build_dir = layout.build_dir();
    let code = Cmd::new(&config.cmake)
        .arg("--build")
        .arg_path(&build_dir)
        .args(["--target", target])
        .arg(format!("-j{jobs}"))
        .args(["--config", &config.build_config])
        .dir(layout.native_root())
        .stream()?;
    if code != 0 {
        return Err(StageError::BuildFailure {
            target: target.to_string(),
            code,
        });
    }
    Ok(())
}

/// Build the service target.
pub fn build_service(layout: &SourceLayout, config: &Config) -> Result<(), StageError> {
    build_target(layout, config, SERVICE_TARGET)
}
