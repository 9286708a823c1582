//! Configuration management for helmpack.
//!
//! Reads configuration from .env file and environment variables.
//! Environment variables take precedence over .env file.
//!
//! `ARCHFLAGS` is deliberately not read here: it is consulted by the
//! top-level entry point only (and only on macOS), then threaded through
//! `arch_flags`. Library code never inspects the process environment.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CMake build configuration.
pub const DEFAULT_BUILD_CONFIG: &str = "Debug";

/// Helmpack configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Staging root the package image is assembled into
    /// (default: `<packaging>/dist/staging`).
    pub staging_dir: PathBuf,
    /// CMake build configuration, e.g. "Debug" or "Release".
    pub build_config: String,
    /// CMake executable (default: "cmake").
    pub cmake: String,
    /// Python interpreter used to run `grpc_tools.protoc` (default: "python3").
    pub python: String,
    /// Raw architecture flag string, macOS only, supplied by the entry point.
    pub arch_flags: Option<String>,
}

impl Config {
    /// Load configuration from .env file and environment.
    ///
    /// `arch_flags` comes from the caller so that the environment read stays
    /// at the binary boundary.
    pub fn load(base_dir: &Path, arch_flags: Option<String>) -> Self {
        let mut env_vars = HashMap::new();

        // Try to load .env file
        let env_path = base_dir.join(".env");
        if env_path.exists() {
            if let Ok(content) = fs::read_to_string(&env_path) {
                for line in content.lines() {
                    let line = line.trim();
                    // Skip comments and empty lines
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    // Parse KEY=value
                    if let Some((key, value)) = line.split_once('=') {
                        let key = key.trim();
                        let value = value.trim();
                        // Remove quotes if present
                        let value = value.trim_matches('"').trim_matches('\'');
                        env_vars.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        // Environment variables override .env file
        for (key, value) in std::env::vars() {
            env_vars.insert(key, value);
        }

        let staging_dir = env_vars
            .get("STAGING_DIR")
            .map(|s| {
                let path = PathBuf::from(s);
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .unwrap_or_else(|| base_dir.join("dist/staging"));

        let build_config = env_vars
            .get("BUILD_CONFIG")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BUILD_CONFIG.to_string());

        let cmake = env_vars
            .get("CMAKE")
            .cloned()
            .unwrap_or_else(|| "cmake".to_string());

        let python = env_vars
            .get("PROTOC_PYTHON")
            .cloned()
            .unwrap_or_else(|| "python3".to_string());

        Self {
            staging_dir,
            build_config,
            cmake,
            python,
            arch_flags,
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  STAGING_DIR: {}", self.staging_dir.display());
        println!("  BUILD_CONFIG: {}", self.build_config);
        println!("  CMAKE: {}", self.cmake);
        println!("  PROTOC_PYTHON: {}", self.python);
        match &self.arch_flags {
            Some(flags) => println!("  ARCHFLAGS: {}", flags),
            None => println!("  ARCHFLAGS: (not set)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var precedence is covered by the serial integration tests; here we
    // only exercise defaults against a directory with no .env.

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None);
        assert_eq!(config.staging_dir, dir.path().join("dist/staging"));
        assert_eq!(config.build_config, "Debug");
        assert_eq!(config.cmake, "cmake");
        assert_eq!(config.python, "python3");
        assert!(config.arch_flags.is_none());
    }

    #[test]
    fn test_dotenv_relative_staging_dir_is_anchored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "STAGING_DIR=out/image\n").unwrap();
        let config = Config::load(dir.path(), None);
        assert_eq!(config.staging_dir, dir.path().join("out/image"));
    }

    #[test]
    fn test_arch_flags_threaded_from_caller() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), Some("-arch arm64".to_string()));
        assert_eq!(config.arch_flags.as_deref(), Some("-arch arm64"));
    }
}
