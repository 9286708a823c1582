//! Helmpack library exports.
//!
//! Exposes the staging components for the binary and for integration
//! testing.

pub mod assets;
pub mod cmake;
pub mod commands;
pub mod config;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod protogen;
