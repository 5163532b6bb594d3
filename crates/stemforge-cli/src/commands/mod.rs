mod build;
mod doctor;
mod init;

pub use build::{build_azure, build_vsphere, build_vsphere_add_updates};
pub use doctor::doctor;
pub use init::init;
