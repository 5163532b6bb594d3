//! Build BOSH Windows stemcell images with Packer.
//!
//! This is the unified facade crate that re-exports all Stemforge
//! sub-crates. Use feature flags to control which components are included.
//!
//! # Feature flags
//!
//! | Feature | Default | Crate | Description |
//! |---------|---------|-------|-------------|
//! | `core` | yes | [`stemforge-core`](https://crates.io/crates/stemforge-core) | Configuration, settings, and shared errors |
//! | `packer` | yes | [`stemforge-packer`](https://crates.io/crates/stemforge-packer) | Packer configuration document model |
//! | `runner` | yes | [`stemforge-runner`](https://crates.io/crates/stemforge-runner) | External tool invocation and output capture |
//! | `builder` | yes | [`stemforge-builder`](https://crates.io/crates/stemforge-builder) | Per-IaaS build orchestration and packaging |
//!
//! # Quick start
//!
//! ```toml
//! [dependencies]
//! stemforge = "0.3"
//! ```
//!
//! ```rust,no_run
//! use std::path::Path;
//! use stemforge::{Environment, StemcellSettings, StemforgeConfig, VsphereSettings};
//! use stemforge::builder::VsphereBuilder;
//! use stemforge::packer::DepsDir;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StemforgeConfig::load(Path::new("stemforge.toml"))?;
//! let env = Environment::capture();
//!
//! let stemcell = StemcellSettings::from_config(&config)?;
//! let settings = VsphereSettings::assemble(&config, &env)?;
//! let deps = DepsDir::discover(env.get("STEMCELL_DEPS_DIR"));
//!
//! let artifact = VsphereBuilder::new(stemcell, settings, deps)
//!     .build(&Default::default())
//!     .await?;
//! println!("{}", artifact.display());
//! # Ok(())
//! # }
//! ```

// Core types flattened into the root namespace for convenience.
#[cfg(feature = "core")]
pub use stemforge_core::*;

/// Packer configuration document model.
///
/// See [`stemforge-packer`](https://crates.io/crates/stemforge-packer) for details.
#[cfg(feature = "packer")]
pub mod packer {
    pub use stemforge_packer::*;
}

/// External tool invocation and output capture.
///
/// See [`stemforge-runner`](https://crates.io/crates/stemforge-runner) for details.
#[cfg(feature = "runner")]
pub mod runner {
    pub use stemforge_runner::*;
}

/// Per-IaaS build orchestration and packaging.
///
/// See [`stemforge-builder`](https://crates.io/crates/stemforge-builder) for details.
#[cfg(feature = "builder")]
pub mod builder {
    pub use stemforge_builder::*;
}
