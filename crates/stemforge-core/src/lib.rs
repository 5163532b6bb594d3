//! Core types and configuration for stemforge.
//!
//! This crate defines the `stemforge.toml` schema ([`StemforgeConfig`]),
//! the process-environment snapshot ([`Environment`]), the validated
//! per-build settings ([`settings`]), and shared error types.

pub mod config;
pub mod environment;
pub mod error;
pub mod settings;

pub use config::{AzureSection, StemcellSection, StemforgeConfig, VsphereSection};
pub use environment::Environment;
pub use error::{Error, Result};
pub use settings::{AzureSettings, StemcellSettings, VsphereSettings};
