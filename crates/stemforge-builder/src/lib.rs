//! Per-IaaS stemcell build orchestration.
//!
//! Each builder walks the same sequence: validate settings, generate the
//! configuration document, run the external tool, then hand the result to
//! the packaging collaborator. Any failing stage aborts the build; there
//! are no retries.

pub mod azure;
pub mod error;
pub mod manifest;
pub mod packager;
pub mod vsphere;

pub use azure::AzureBuilder;
pub use error::{BuildError, Result};
pub use manifest::{ApplySpec, Manifest};
pub use packager::{PackageError, PackageRequest, Packager, TarPackager};
pub use vsphere::{VsphereBuilder, VsphereUpdateBuilder};
