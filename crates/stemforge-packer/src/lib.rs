//! Packer configuration document model for stemforge.
//!
//! # Document pipeline
//!
//! ```text
//! stemforge build <platform>
//!   1. Context   ── BuildContext::generate() (one clock reading, one secret)
//!   2. Deps scan ── DepsDir::discover(STEMCELL_DEPS_DIR)
//!   3. Model     ── VsphereConfig / VsphereUpdateConfig / AzureConfig
//!   4. Document  ── PackerDocument::dump() → JSON handed to the build tool
//! ```
//!
//! # Step ordering
//!
//! Provisioner sequences are assembled as ordered vectors of
//! [`ProvisionerStep`] values, with whole steps appearing or vanishing based
//! on explicit flags and the dependency-directory scan. The order is a
//! contract with the guest: account creation precedes every step that uses
//! the provisioning account, and `Clear-Provisioner` runs last.

pub mod azure;
pub mod builders;
pub mod context;
pub mod document;
mod provision;
pub mod steps;
pub mod sysprep;
pub mod vsphere;

pub use azure::AzureConfig;
pub use builders::{AzureArmBuilder, BuilderDefinition, VmxBuilder, VmxData};
pub use context::{BuildContext, DepsDir};
pub use document::{DocumentError, PackerDocument};
pub use steps::ProvisionerStep;
pub use sysprep::SysprepCommand;
pub use vsphere::{VsphereConfig, VsphereUpdateConfig};
